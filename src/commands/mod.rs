pub mod demo_api;
