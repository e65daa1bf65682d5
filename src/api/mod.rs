pub mod generation_api;
