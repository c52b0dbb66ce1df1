//! inode 解码

use alloc::vec::Vec;
use log::{debug, warn};

use crate::{
    consts::*,
    endian::{read_u32, read_u64, ByteReader, Endian},
    error::{Error, ErrorKind, Inconsistency, Result},
    extent::scan_extents,
    types::{InodeFlags, InodeFlags2, InodeType, Permissions, Timestamp},
};

use super::{
    parse_shortform, InodeDecodeOptions, InodeFormat, InodePayload, InodeRecord, InodeV3,
    MismatchPolicy,
};

fn decode_timestamp(raw: &[u8], endian: Endian, bigtime: bool) -> Timestamp {
    if bigtime {
        Timestamp::from_bigtime(read_u64(endian, raw))
    } else {
        Timestamp::from_legacy(read_u32(endian, &raw[0..4]), read_u32(endian, &raw[4..8]))
    }
}

/// 读取 v3 扩展字段，游标位于偏移 100
fn read_v3(r: &mut ByteReader<'_>) -> Result<InodeV3> {
    let endian = r.endian();
    let crc = r.u32()?;
    let change_count = r.u64()?;
    let lsn = r.u64()?;
    let flags2 = InodeFlags2::from_bits_truncate(r.u64()?);
    let cow_extsize = r.u32()?;
    r.skip(12)?;
    let crtime = decode_timestamp(r.bytes(8)?, endian, flags2.contains(InodeFlags2::BIGTIME));
    let ino = r.u64()?;
    let uuid = r.uuid()?;

    Ok(InodeV3 {
        crc,
        change_count,
        lsn,
        flags2,
        cow_extsize,
        crtime,
        ino,
        uuid,
    })
}

/// 记录一条软性不一致
fn note(warnings: &mut Vec<Inconsistency>, issue: Inconsistency) {
    warn!("{}", issue);
    warnings.push(issue);
}

/// 解码 inode
///
/// # 参数
///
/// * `buf` - inode 缓冲区，至少 `opts.inode_size` 字节
/// * `endian` - 字段字节序
/// * `requested` - 调用者请求的 inode 编号，用于与 v3 记录值比对
/// * `opts` - 解码配置
///
/// # 返回
///
/// 成功返回 `InodeRecord`；魔数不符返回 `BadMagic`，缓冲区过短返回
/// `Truncated`，未知格式返回 `UnsupportedFormat`，`Reject` 策略下编号
/// 不一致返回 `Inconsistent`
pub fn decode_inode(
    buf: &[u8],
    endian: Endian,
    requested: Option<u64>,
    opts: &InodeDecodeOptions,
) -> Result<InodeRecord> {
    debug!(
        "decode_inode: len={}, requested={:?}, inode_size={}",
        buf.len(),
        requested,
        opts.inode_size
    );

    if buf.len() < opts.inode_size {
        return Err(Error::truncated("buffer shorter than inode size"));
    }
    let buf = &buf[..opts.inode_size];
    let mut r = ByteReader::new(buf, endian);

    if r.u16()? != XFS_DINODE_MAGIC {
        return Err(Error::new(ErrorKind::BadMagic, "bad inode magic"));
    }

    let mode = r.u16()?;
    let version = r.u8()?;
    let format_raw = r.u8()?;
    let onlink = r.u16()?;
    let uid = r.u32()?;
    let gid = r.u32()?;
    let nlink32 = r.u32()?;
    let projid_lo = r.u16()?;
    let projid_hi = r.u16()?;
    // di_big_nextents 与 pad + flushiter 共用 24..32
    let big_nextents = r.u64()?;
    let atime_raw = r.bytes(8)?;
    let mtime_raw = r.bytes(8)?;
    let ctime_raw = r.bytes(8)?;
    let size = r.u64()?;
    let nblocks = r.u64()?;
    let extsize = r.u32()?;
    let nextents32 = r.u32()?;
    let anextents16 = r.u16()?;
    let forkoff = r.u8()?;
    let aformat = r.u8()?;
    let _dmevmask = r.u32()?;
    let _dmstate = r.u16()?;
    let flags = InodeFlags::from_bits_truncate(r.u16()?);
    let gen = r.u32()?;
    let next_unlinked = r.u32()?;

    let (v3, core_size) = if version >= 3 {
        (Some(read_v3(&mut r)?), XFS_DINODE_CORE_SIZE_V3)
    } else {
        (None, XFS_DINODE_CORE_SIZE_V2)
    };

    let flags2 = v3.as_ref().map_or(InodeFlags2::empty(), |v3| v3.flags2);
    let bigtime = flags2.contains(InodeFlags2::BIGTIME);

    let (nextents, anextents) = if flags2.contains(InodeFlags2::NREXT64) {
        (big_nextents, nextents32)
    } else {
        (nextents32 as u64, anextents16 as u32)
    };

    let format = InodeFormat::from_raw(format_raw)
        .ok_or_else(|| Error::new(ErrorKind::UnsupportedFormat, "unknown inode data fork format"))?;

    let mut warnings = Vec::new();

    let recorded = v3.as_ref().map(|v| v.ino).unwrap_or(0);
    if let Some(requested) = requested {
        if recorded != 0 && recorded != requested {
            match opts.mismatch_policy {
                MismatchPolicy::Reject => {
                    return Err(Error::new(
                        ErrorKind::Inconsistent,
                        "recorded inode number differs from requested",
                    ));
                }
                MismatchPolicy::Warn => note(
                    &mut warnings,
                    Inconsistency::InodeNumberMismatch {
                        requested,
                        recorded,
                    },
                ),
            }
        }
    }

    // 数据 fork: core 之后到属性 fork（或 inode 末尾）
    let fork_end = if forkoff != 0 {
        core_size + ((forkoff as usize) << XFS_FORKOFF_SHIFT)
    } else {
        opts.inode_size
    };
    if fork_end > opts.inode_size {
        return Err(Error::corrupted("attribute fork offset beyond inode"));
    }
    let fork = &buf[core_size..fork_end];

    let inode_type = InodeType::from(mode);
    let payload = match format {
        InodeFormat::Local => match inode_type {
            InodeType::Directory => {
                InodePayload::Shortform(parse_shortform(fork, endian, opts.has_ftype)?)
            }
            InodeType::Symlink if size > 0 => {
                let len = usize::try_from(size)
                    .ok()
                    .filter(|&len| len <= fork.len())
                    .ok_or_else(|| Error::truncated("inline symlink longer than data fork"))?;
                InodePayload::Symlink(fork[..len].to_vec())
            }
            _ if size == 0 => InodePayload::Empty,
            _ => InodePayload::Unsupported(InodeFormat::Local),
        },
        InodeFormat::Extents if nblocks > 0 => {
            let mut scan = scan_extents(fork, endian, nblocks)?;
            warnings.append(&mut scan.warnings);
            if !scan.is_complete(nblocks) {
                note(
                    &mut warnings,
                    Inconsistency::ExtentScanShort {
                        declared_blocks: nblocks,
                        found_blocks: scan.found_blocks,
                    },
                );
            }
            let found = scan.extents.len() as u64;
            if nextents != 0 && nextents != found {
                note(
                    &mut warnings,
                    Inconsistency::ExtentCountMismatch {
                        declared: nextents,
                        found,
                    },
                );
            }
            InodePayload::Extents(scan.extents)
        }
        InodeFormat::Extents => InodePayload::Empty,
        other => InodePayload::Unsupported(other),
    };

    Ok(InodeRecord {
        ino: requested.unwrap_or(recorded),
        mode,
        inode_type,
        permissions: Permissions::from_mode(mode),
        version,
        format,
        uid,
        gid,
        nlink: if version == 1 { onlink as u32 } else { nlink32 },
        projid: if version == 1 {
            0
        } else {
            ((projid_hi as u32) << 16) | projid_lo as u32
        },
        size,
        nblocks,
        extsize,
        nextents,
        anextents,
        forkoff,
        aformat,
        flags,
        gen,
        next_unlinked,
        atime: decode_timestamp(atime_raw, endian, bigtime),
        mtime: decode_timestamp(mtime_raw, endian, bigtime),
        ctime: decode_timestamp(ctime_raw, endian, bigtime),
        v3,
        payload,
        warnings,
    })
}
