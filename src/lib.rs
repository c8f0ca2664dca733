//! Back office for a small shop: the admin session guard and product image
//! intake used by the admin panel, the HTTP client it talks through, and the
//! REST server that backs it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod intake;
pub mod routes;
pub mod session;
pub mod state;

pub mod crypto {
    pub mod jwt;
    pub mod password;
}

pub mod models {
    pub mod admin;
    pub mod category;
    pub mod product;
}

pub mod repositories {
    pub mod admin;
    pub mod category;
    pub mod product;
}

pub mod services {
    pub mod auth;
    pub mod categories;
    pub mod products;
}

pub mod handlers {
    pub mod auth;
    pub mod categories;
    pub mod products;
    pub mod root;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
