pub mod feed;
pub mod http_client;
pub mod sheet_fetch;
pub mod state;
