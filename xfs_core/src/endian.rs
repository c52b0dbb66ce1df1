//! 字节序与 UUID 基础操作
//!
//! XFS 规定磁盘格式为大端，但取证镜像可能来自字节序不明的来源，因此字节序
//! 由 superblock 魔数探测一次，之后作为参数显式传给每个解码调用。

use alloc::string::String;
use core::fmt::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// 字段字节序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// 用两种字节序读取前 4 字节，返回得到 `magic` 的那一种
    ///
    /// 缓冲区不足 4 字节或两种读法都不匹配时返回 `None`。
    pub fn probe(buf: &[u8], magic: u32) -> Option<Self> {
        let head = buf.get(..4)?;
        if BigEndian::read_u32(head) == magic {
            Some(Endian::Big)
        } else if LittleEndian::read_u32(head) == magic {
            Some(Endian::Little)
        } else {
            None
        }
    }
}

// 以下读取函数要求 `bytes` 至少与字段等宽，否则 panic。
// 解码器统一经由 `ByteReader` 调用，由它先做边界检查。

/// 读取 16 位字段
///
/// # Panics
///
/// `bytes.len() < 2` 时 panic
pub fn read_u16(endian: Endian, bytes: &[u8]) -> u16 {
    match endian {
        Endian::Big => BigEndian::read_u16(bytes),
        Endian::Little => LittleEndian::read_u16(bytes),
    }
}

/// 读取 24 位字段
///
/// # Panics
///
/// `bytes.len() < 3` 时 panic
pub fn read_u24(endian: Endian, bytes: &[u8]) -> u32 {
    match endian {
        Endian::Big => BigEndian::read_u24(bytes),
        Endian::Little => LittleEndian::read_u24(bytes),
    }
}

/// 读取 32 位字段
///
/// # Panics
///
/// `bytes.len() < 4` 时 panic
pub fn read_u32(endian: Endian, bytes: &[u8]) -> u32 {
    match endian {
        Endian::Big => BigEndian::read_u32(bytes),
        Endian::Little => LittleEndian::read_u32(bytes),
    }
}

/// 读取 48 位字段
///
/// # Panics
///
/// `bytes.len() < 6` 时 panic
pub fn read_u48(endian: Endian, bytes: &[u8]) -> u64 {
    match endian {
        Endian::Big => BigEndian::read_u48(bytes),
        Endian::Little => LittleEndian::read_u48(bytes),
    }
}

/// 读取 64 位字段
///
/// # Panics
///
/// `bytes.len() < 8` 时 panic
pub fn read_u64(endian: Endian, bytes: &[u8]) -> u64 {
    match endian {
        Endian::Big => BigEndian::read_u64(bytes),
        Endian::Little => LittleEndian::read_u64(bytes),
    }
}

/// 把 16 字节原始 UUID 渲染为 `AAAAAAAA-BBBB-CCCC-DDEE-FFFFFFFFFFFF`
///
/// 按 4-2-2-2-6 字节分组，大写十六进制。
pub fn format_uuid(raw: &[u8; 16]) -> String {
    let mut out = String::with_capacity(36);
    for (i, byte) in raw.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        // 写入 String 不会失败
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// 带边界检查的字段游标
///
/// 每次读取前检查剩余字节数，越界返回 `Truncated`，不会 panic。
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8], endian: Endian) -> Self {
        Self { buf, pos: 0, endian }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// 当前偏移
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 剩余字节数
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// 剩余的字节（不移动游标）
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// 移动到绝对偏移
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(Error::truncated("seek past end of buffer"));
        }
        self.pos = pos;
        Ok(())
    }

    /// 跳过 `n` 字节
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// 取出 `n` 字节
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        let endian = self.endian;
        self.take(2).map(|b| read_u16(endian, b))
    }

    pub fn u24(&mut self) -> Result<u32> {
        let endian = self.endian;
        self.take(3).map(|b| read_u24(endian, b))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let endian = self.endian;
        self.take(4).map(|b| read_u32(endian, b))
    }

    pub fn u48(&mut self) -> Result<u64> {
        let endian = self.endian;
        self.take(6).map(|b| read_u48(endian, b))
    }

    pub fn u64(&mut self) -> Result<u64> {
        let endian = self.endian;
        self.take(8).map(|b| read_u64(endian, b))
    }

    /// 读取 16 字节原始 UUID
    pub fn uuid_raw(&mut self) -> Result<[u8; 16]> {
        let mut raw = [0u8; 16];
        raw.copy_from_slice(self.take(16)?);
        Ok(raw)
    }

    /// 读取 UUID 并渲染为字符串
    pub fn uuid(&mut self) -> Result<String> {
        self.uuid_raw().map(|raw| format_uuid(&raw))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| Error::truncated("field extends past end of buffer"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }
}
