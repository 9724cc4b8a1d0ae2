// handlers/protected/mod.rs - Protected handlers (require_actor applied)
//
// Every handler here can rely on an `Actor` in request extensions.
pub mod bulk; // POST /api/:resource/bulk
pub mod categories; // Category listing, tree and hierarchy writes
