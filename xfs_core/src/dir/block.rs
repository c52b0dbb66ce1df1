//! 目录块解析

use alloc::{string::String, vec::Vec};
use log::{debug, warn};

use crate::{
    consts::*,
    endian::{read_u16, read_u32, ByteReader, Endian},
    error::{Error, ErrorKind, Inconsistency, Result},
    superblock::Geometry,
    types::DirFileType,
};

use super::{data_entry_padding, data_entry_size, DirEntry};

/// 空闲区描述（best_free）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestFree {
    pub offset: u16,
    pub length: u16,
}

/// v3 目录块头特有字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBlockV3 {
    /// 原样透传，不校验
    pub crc: u32,
    /// 块的磁盘地址（512 字节扇区单位）
    pub blkno: u64,
    pub lsn: u64,
    pub uuid: String,
    /// 所属目录 inode
    pub owner: u64,
}

/// 目录块头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBlockHeader {
    pub magic: u32,
    /// 仅 XDB3 / XDD3
    pub v3: Option<DirBlockV3>,
    pub best_free: [BestFree; 3],
}

impl DirBlockHeader {
    /// 是否为单块目录（块尾带 leaf 数组与 tail）
    pub fn is_block_form(&self) -> bool {
        matches!(self.magic, XFS_DIR3_BLOCK_MAGIC | XFS_DIR2_BLOCK_MAGIC)
    }

    /// 头部长度，目录项从这里开始
    pub fn size(&self) -> usize {
        if self.v3.is_some() {
            XFS_DIR3_DATA_HDR_SIZE
        } else {
            XFS_DIR2_DATA_HDR_SIZE
        }
    }
}

/// 解码后的目录块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBlock {
    pub header: DirBlockHeader,
    pub entries: Vec<DirEntry>,
    pub warnings: Vec<Inconsistency>,
}

/// 目录块解码配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirBlockOptions {
    /// 目录块大小（字节）
    pub block_size: usize,
    /// 目录项是否带文件类型字节
    pub has_ftype: bool,
}

impl Default for DirBlockOptions {
    fn default() -> Self {
        Self {
            block_size: 4096,
            has_ftype: true,
        }
    }
}

impl DirBlockOptions {
    pub fn from_geometry(geom: &Geometry) -> Self {
        Self {
            block_size: geom.dir_block_size(),
            has_ftype: geom.has_ftype,
        }
    }
}

fn read_header(r: &mut ByteReader<'_>) -> Result<DirBlockHeader> {
    let magic = r.u32()?;

    let v3 = match magic {
        XFS_DIR3_BLOCK_MAGIC | XFS_DIR3_DATA_MAGIC => {
            let crc = r.u32()?;
            let blkno = r.u64()?;
            let lsn = r.u64()?;
            let uuid = r.uuid()?;
            let owner = r.u64()?;
            Some(DirBlockV3 {
                crc,
                blkno,
                lsn,
                uuid,
                owner,
            })
        }
        XFS_DIR2_BLOCK_MAGIC | XFS_DIR2_DATA_MAGIC => None,
        _ => return Err(Error::new(ErrorKind::BadMagic, "bad directory block magic")),
    };

    let mut best_free = [BestFree::default(); 3];
    for bf in best_free.iter_mut() {
        bf.offset = r.u16()?;
        bf.length = r.u16()?;
    }
    if v3.is_some() {
        // pad
        r.skip(4)?;
    }

    Ok(DirBlockHeader {
        magic,
        v3,
        best_free,
    })
}

/// 块形式目录的数据区终点：块尾 tail 与 leaf 数组之前
fn block_form_data_end(buf: &[u8], endian: Endian, hdr_size: usize) -> Result<usize> {
    let tail = buf
        .len()
        .checked_sub(XFS_DIR2_BLOCK_TAIL_SIZE)
        .filter(|&tail| tail >= hdr_size)
        .ok_or_else(|| Error::truncated("directory block too small for tail"))?;
    let count = read_u32(endian, &buf[tail..tail + 4]) as usize;

    count
        .checked_mul(XFS_DIR2_LEAF_ENTRY_SIZE)
        .and_then(|leaf| tail.checked_sub(leaf))
        .filter(|&end| end >= hdr_size)
        .ok_or_else(|| Error::corrupted("leaf count exceeds directory block"))
}

/// 解码一个目录块
///
/// # 参数
///
/// * `buf` - 目录块缓冲区，至少 `opts.block_size` 字节
/// * `endian` - 字段字节序
/// * `opts` - 块大小与 ftype 配置
///
/// # 返回
///
/// 成功返回 `DirBlock`；魔数不符返回 `BadMagic`，缓冲区过短或目录项越界
/// 返回 `Truncated`，块尾 leaf 计数不合理返回 `Corrupted`
///
/// # 说明
///
/// 扫描遇到以下任一情况结束：空闲标记 0xFFFF、8 字节全零、数据区末尾。
pub fn decode_dir_block(buf: &[u8], endian: Endian, opts: &DirBlockOptions) -> Result<DirBlock> {
    debug!(
        "decode_dir_block: len={}, block_size={}, ftype={}",
        buf.len(),
        opts.block_size,
        opts.has_ftype
    );

    if buf.len() < opts.block_size {
        return Err(Error::truncated("buffer shorter than directory block"));
    }
    let buf = &buf[..opts.block_size];

    let mut r = ByteReader::new(buf, endian);
    let header = read_header(&mut r)?;
    let hdr_size = header.size();

    let data_end = if header.is_block_form() {
        block_form_data_end(buf, endian, hdr_size)?
    } else {
        buf.len()
    };

    let mut r = ByteReader::new(&buf[..data_end], endian);
    r.seek(hdr_size)?;

    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    loop {
        let offset = r.position();
        let rest = r.rest();
        if rest.is_empty() {
            break;
        }
        if rest.len() >= 2 && read_u16(endian, rest) == XFS_DIR2_DATA_FREE_TAG {
            break;
        }
        if rest.iter().take(8).all(|&b| b == 0) {
            break;
        }

        let inumber = r.u64()?;
        let namelen = r.u8()? as usize;
        let name = r.bytes(namelen)?.to_vec();
        let file_type = if opts.has_ftype {
            DirFileType::from(r.u8()?)
        } else {
            DirFileType::Unknown
        };
        let padding = if opts.has_ftype {
            data_entry_padding(namelen)
        } else {
            let used = r.position() - offset;
            data_entry_size(namelen, false) - used - 2
        };
        r.skip(padding)?;
        let tag = r.u16()?;

        if tag as usize != offset {
            let issue = Inconsistency::DirTagMismatch { offset, tag };
            warn!("{}", issue);
            warnings.push(issue);
        }

        entries.push(DirEntry {
            inumber,
            name,
            file_type,
            tag,
        });
    }

    Ok(DirBlock {
        header,
        entries,
        warnings,
    })
}
