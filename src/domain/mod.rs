pub mod manifest;
pub mod payload;
pub mod subscription;
pub mod vapid;
