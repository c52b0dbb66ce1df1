//! 镜像源核心类型

use crate::error::Result;

/// 镜像字节源
///
/// 实现此 trait 以提供对镜像（磁盘、分区、文件或内存缓冲区）的随机读取。
///
/// # 示例
///
/// ```rust,ignore
/// use xfs_core::{ImageSource, Result};
///
/// struct MyImage {
///     // ...
/// }
///
/// impl ImageSource for MyImage {
///     fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
///         // 从 offset 开始读取，返回实际读到的字节数
///         Ok(0)
///     }
/// }
/// ```
pub trait ImageSource {
    /// 从绝对字节偏移读取
    ///
    /// # 参数
    ///
    /// * `offset` - 镜像内字节偏移
    /// * `buf` - 目标缓冲区
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数；到达镜像末尾时可能少于 `buf.len()`，
    /// 返回 0 表示偏移已在末尾之后
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

fn read_from_slice(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    if start >= data.len() {
        return 0;
    }
    let n = buf.len().min(data.len() - start);
    buf[..n].copy_from_slice(&data[start..start + n]);
    n
}

impl ImageSource for &[u8] {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        Ok(read_from_slice(self, offset, buf))
    }
}

impl ImageSource for alloc::vec::Vec<u8> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        Ok(read_from_slice(self, offset, buf))
    }
}

impl<S: ImageSource + ?Sized> ImageSource for &mut S {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        (**self).read_at(offset, buf)
    }
}

#[cfg(feature = "std")]
impl ImageSource for std::fs::File {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        use crate::error::{Error, ErrorKind};
        use std::io::{Read, Seek, SeekFrom};

        let io_err = |_| Error::new(ErrorKind::Io, "image file read failed");
        self.seek(SeekFrom::Start(offset)).map_err(io_err)?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            }
        }
        Ok(filled)
    }
}

/// 镜像读取包装器
///
/// 为 XFS 解码提供按文件系统区域寻址的读取，包含统计信息。
pub struct ImageReader<S> {
    /// 底层镜像源
    source: S,
    /// 文件系统区域在镜像内的起始偏移（字节）
    region_offset: u64,
    /// 读取次数
    read_count: u64,
    /// 累计读取字节数
    bytes_read: u64,
}

impl<S: ImageSource> ImageReader<S> {
    /// 创建新的读取包装器
    pub fn new(source: S) -> Self {
        Self {
            source,
            region_offset: 0,
            read_count: 0,
            bytes_read: 0,
        }
    }

    /// 创建带区域偏移的读取包装器
    pub fn with_region_offset(source: S, region_offset: u64) -> Self {
        Self {
            region_offset,
            ..Self::new(source)
        }
    }

    /// 获取底层镜像源的引用
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 获取底层镜像源的可变引用
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// 取回底层镜像源
    pub fn into_inner(self) -> S {
        self.source
    }

    /// 获取区域偏移
    pub fn region_offset(&self) -> u64 {
        self.region_offset
    }

    /// 获取读取次数
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// 获取累计读取字节数
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub(super) fn record_read(&mut self, len: usize) {
        self.read_count += 1;
        self.bytes_read += len as u64;
    }
}
