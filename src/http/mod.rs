//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, peer address via ConnectInfo)
//!     → request.rs (request line, peer, access-log fields)
//!     → handler.rs (client IP → classify → authorize → whois + headers)
//!     → render.rs (PresentationRecord → HTML)
//!     → response.rs (200 page or generic 500)
//!     → Send to client
//! ```

pub mod handler;
pub mod render;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{PresentationRecord, RequestHandler};
pub use render::{HandlebarsRenderer, Render, RenderError};
pub use server::{build_router, AppState, HttpServer};
