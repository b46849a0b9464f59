pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod client;
    pub mod order;
    pub mod session;
}

pub mod repositories {
    pub mod http_session;
    pub mod memory_session;
    pub mod redis_session;
    pub mod session;
}

pub mod services {
    pub mod auth;
    pub mod mailer;
}

pub mod handlers {
    pub mod auth;
}

pub mod middleware_layer {
    pub mod auth;
}
