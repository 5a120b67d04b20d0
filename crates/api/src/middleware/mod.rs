pub mod show_token;
