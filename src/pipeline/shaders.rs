pub mod phong;
pub mod unlit;
