/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller role carried in the token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    User,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            "user" => Ok(Role::User),
            "guest" => Ok(Role::Guest),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Resource types that accept bulk actions. Each maps to one document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Orders,
    Categories,
    Shops,
    Reviews,
    Auctions,
    Products,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Orders,
        Resource::Categories,
        Resource::Shops,
        Resource::Reviews,
        Resource::Auctions,
        Resource::Products,
    ];

    pub fn collection(&self) -> &'static str {
        match self {
            Resource::Orders => "orders",
            Resource::Categories => "categories",
            Resource::Shops => "shops",
            Resource::Reviews => "reviews",
            Resource::Auctions => "auctions",
            Resource::Products => "products",
        }
    }

    /// Singular label used in client-facing messages ("Category cat1 has subcategories")
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Orders => "Order",
            Resource::Categories => "Category",
            Resource::Shops => "Shop",
            Resource::Reviews => "Review",
            Resource::Auctions => "Auction",
            Resource::Products => "Product",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.collection() == s)
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}
