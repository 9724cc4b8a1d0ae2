// handlers/mod.rs - Handler tiers
//
// public:    no authentication (/, /health)
// protected: JWT via Bearer header or session cookie (/api/*)
pub mod protected;
pub mod public;
