//! 镜像读取抽象
//!
//! 提供镜像字节源接口和带区域偏移的读取包装。

mod device;
mod io;

pub use device::{ImageReader, ImageSource};
