/// API route modules
pub mod health;
pub mod musics;
pub mod proxy;
