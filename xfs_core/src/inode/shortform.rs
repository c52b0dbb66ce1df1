//! 短格式目录解析
//!
//! 布局：
//! ```text
//! count(1) i8count(1) parent(4|8)
//! { namelen(1) offset(2) name(namelen) [filetype(1)] inumber(4|8) } * count
//! ```
//! 项之间没有填充。

use alloc::vec::Vec;

use crate::{
    consts::*,
    dir::DirEntry,
    endian::{read_u32, read_u64, ByteReader, Endian},
    error::Result,
    types::DirFileType,
};

use super::ShortformDir;

fn read_ino(reader: &mut ByteReader<'_>, wide: bool) -> Result<u64> {
    let endian = reader.endian();
    if wide {
        let raw = reader.bytes(XFS_INO64_SIZE)?;
        Ok(read_u64(endian, raw) & XFS_MAXINUMBER)
    } else {
        let raw = reader.bytes(XFS_INO32_SIZE)?;
        Ok(read_u32(endian, raw) as u64)
    }
}

/// 解析内联目录
///
/// # 参数
///
/// * `fork` - 数据 fork 字节
/// * `endian` - 字段字节序
/// * `has_ftype` - 目录项是否带文件类型字节
///
/// # 返回
///
/// 任一字段越过 `fork` 末尾时返回 `Truncated`
pub fn parse_shortform(fork: &[u8], endian: Endian, has_ftype: bool) -> Result<ShortformDir> {
    let mut reader = ByteReader::new(fork, endian);

    let count = reader.u8()?;
    let i8count = reader.u8()?;
    let wide = i8count != 0;
    let parent = read_ino(&mut reader, wide)?;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let namelen = reader.u8()? as usize;
        let tag = reader.u16()?;
        let name = reader.bytes(namelen)?.to_vec();
        let file_type = if has_ftype {
            DirFileType::from(reader.u8()?)
        } else {
            DirFileType::Unknown
        };
        let inumber = read_ino(&mut reader, wide)?;

        entries.push(DirEntry {
            inumber,
            name,
            file_type,
            tag,
        });
    }

    Ok(ShortformDir {
        parent,
        i8count,
        entries,
    })
}
