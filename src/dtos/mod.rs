pub mod auth_dtos;
pub mod katalog_dtos;
// alias supaya dapat dipanggil sebagai `crate::dtos::auth` dan `crate::dtos::katalog`
pub use auth_dtos as auth;
pub use katalog_dtos as katalog;
