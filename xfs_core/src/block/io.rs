//! 镜像读取操作实现

use alloc::{vec, vec::Vec};
use log::debug;

use super::{ImageReader, ImageSource};
use crate::error::{Error, Result};

impl<S: ImageSource> ImageReader<S> {
    /// 读取字节到缓冲区
    ///
    /// # 参数
    ///
    /// * `offset` - 文件系统区域内的字节偏移
    /// * `buf` - 目标缓冲区，必须被完整填满
    ///
    /// # 返回
    ///
    /// 镜像在填满前结束时返回 `Truncated`，镜像源失败时透传其错误
    pub fn read_into(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        debug!("read_into: offset={}, len={}", offset, buf.len());

        let start = self
            .region_offset()
            .checked_add(offset)
            .ok_or_else(|| Error::out_of_range("image offset overflow"))?;

        let mut filled = 0usize;
        while filled < buf.len() {
            let pos = start
                .checked_add(filled as u64)
                .ok_or_else(|| Error::out_of_range("image offset overflow"))?;
            let n = self.source_mut().read_at(pos, &mut buf[filled..])?;
            if n == 0 {
                return Err(Error::truncated("short read from image"));
            }
            filled += n;
        }

        self.record_read(buf.len());
        Ok(())
    }

    /// 读取 `len` 字节
    pub fn read_exact(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_into(offset, &mut buf)?;
        Ok(buf)
    }
}
