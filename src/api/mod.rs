pub mod offers_api;
