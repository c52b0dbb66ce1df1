//! Superblock 读取和验证

use alloc::string::String;
use log::debug;

use crate::{
    consts::*,
    endian::{ByteReader, Endian},
    error::{Error, ErrorKind, Result},
    types::IncompatFeatures,
};

/// 探测文件系统字节序
///
/// 读取前 4 字节，分别按大端和小端解释，接受得到 `XFSB` 的那一种。
/// 每个文件系统实例只需调用一次，结果用于之后的所有解码调用。
pub fn probe_endian(buf: &[u8]) -> Result<Endian> {
    if buf.len() < 4 {
        return Err(Error::truncated("superblock magic needs 4 bytes"));
    }
    Endian::probe(buf, XFS_SB_MAGIC)
        .ok_or_else(|| Error::new(ErrorKind::BadMagic, "Invalid XFS superblock magic number"))
}

/// 磁盘上的 superblock（xfs_dsb）
///
/// 所有字段按固定偏移依次排列，这里逐一解码，不做字段间的推导。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superblock {
    pub magicnum: u32,
    pub blocksize: u32,
    pub dblocks: u64,
    pub rblocks: u64,
    pub rextents: u64,
    pub uuid: String,
    pub logstart: u64,
    pub rootino: u64,
    pub rbmino: u64,
    pub rsumino: u64,
    pub rextsize: u32,
    pub agblocks: u32,
    pub agcount: u32,
    pub rbmblocks: u32,
    pub logblocks: u32,
    pub versionnum: u16,
    pub sectsize: u16,
    pub inodesize: u16,
    pub inopblock: u16,
    pub fname: [u8; 12],
    pub blocklog: u8,
    pub sectlog: u8,
    pub inodelog: u8,
    pub inopblog: u8,
    pub agblklog: u8,
    pub rextslog: u8,
    pub inprogress: u8,
    pub imax_pct: u8,
    pub icount: u64,
    pub ifree: u64,
    pub fdblocks: u64,
    pub frextents: u64,
    pub uquotino: u64,
    pub gquotino: u64,
    pub qflags: u16,
    pub flags: u8,
    pub shared_vn: u8,
    pub inoalignmt: u32,
    pub unit: u32,
    pub width: u32,
    pub dirblklog: u8,
    pub logsectlog: u8,
    pub logsectsize: u16,
    pub logsunit: u32,
    pub features2: u32,
    pub bad_features2: u32,
    // v5 字段
    pub features_compat: u32,
    pub features_ro_compat: u32,
    pub features_incompat: u32,
    pub features_log_incompat: u32,
    pub crc: u32,
    pub spino_align: u32,
    pub pquotino: u64,
    pub lsn: u64,
    pub meta_uuid: String,
}

/// 解码 superblock
///
/// # 参数
///
/// * `buf` - 文件系统区域偏移 0 处的至少 512 字节
/// * `endian` - 由 [`probe_endian`] 得到的字节序
///
/// # 返回
///
/// 成功返回 superblock；长度不足返回 `Truncated`，魔数不符返回 `BadMagic`
pub fn decode_superblock(buf: &[u8], endian: Endian) -> Result<Superblock> {
    debug!("decode_superblock: len={}, endian={:?}", buf.len(), endian);

    if buf.len() < XFS_SB_SIZE {
        return Err(Error::truncated("superblock needs 512 bytes"));
    }

    let mut r = ByteReader::new(&buf[..XFS_SB_SIZE], endian);

    let magicnum = r.u32()?;
    if magicnum != XFS_SB_MAGIC {
        return Err(Error::new(
            ErrorKind::BadMagic,
            "Invalid XFS superblock magic number",
        ));
    }

    let blocksize = r.u32()?;
    let dblocks = r.u64()?;
    let rblocks = r.u64()?;
    let rextents = r.u64()?;
    let uuid = r.uuid()?;
    let logstart = r.u64()?;
    let rootino = r.u64()?;
    let rbmino = r.u64()?;
    let rsumino = r.u64()?;
    let rextsize = r.u32()?;
    let agblocks = r.u32()?;
    let agcount = r.u32()?;
    let rbmblocks = r.u32()?;
    let logblocks = r.u32()?;
    let versionnum = r.u16()?;
    let sectsize = r.u16()?;
    let inodesize = r.u16()?;
    let inopblock = r.u16()?;
    let mut fname = [0u8; 12];
    fname.copy_from_slice(r.bytes(12)?);
    let blocklog = r.u8()?;
    let sectlog = r.u8()?;
    let inodelog = r.u8()?;
    let inopblog = r.u8()?;
    let agblklog = r.u8()?;
    let rextslog = r.u8()?;
    let inprogress = r.u8()?;
    let imax_pct = r.u8()?;
    let icount = r.u64()?;
    let ifree = r.u64()?;
    let fdblocks = r.u64()?;
    let frextents = r.u64()?;
    let uquotino = r.u64()?;
    let gquotino = r.u64()?;
    let qflags = r.u16()?;
    let flags = r.u8()?;
    let shared_vn = r.u8()?;
    let inoalignmt = r.u32()?;
    let unit = r.u32()?;
    let width = r.u32()?;
    let dirblklog = r.u8()?;
    let logsectlog = r.u8()?;
    let logsectsize = r.u16()?;
    let logsunit = r.u32()?;
    let features2 = r.u32()?;
    let bad_features2 = r.u32()?;
    let features_compat = r.u32()?;
    let features_ro_compat = r.u32()?;
    let features_incompat = r.u32()?;
    let features_log_incompat = r.u32()?;
    let crc = r.u32()?;
    let spino_align = r.u32()?;
    let pquotino = r.u64()?;
    let lsn = r.u64()?;
    let meta_uuid = r.uuid()?;

    Ok(Superblock {
        magicnum,
        blocksize,
        dblocks,
        rblocks,
        rextents,
        uuid,
        logstart,
        rootino,
        rbmino,
        rsumino,
        rextsize,
        agblocks,
        agcount,
        rbmblocks,
        logblocks,
        versionnum,
        sectsize,
        inodesize,
        inopblock,
        fname,
        blocklog,
        sectlog,
        inodelog,
        inopblog,
        agblklog,
        rextslog,
        inprogress,
        imax_pct,
        icount,
        ifree,
        fdblocks,
        frextents,
        uquotino,
        gquotino,
        qflags,
        flags,
        shared_vn,
        inoalignmt,
        unit,
        width,
        dirblklog,
        logsectlog,
        logsectsize,
        logsunit,
        features2,
        bad_features2,
        features_compat,
        features_ro_compat,
        features_incompat,
        features_log_incompat,
        crc,
        spino_align,
        pquotino,
        lsn,
        meta_uuid,
    })
}

impl Superblock {
    /// superblock 版本（sb_versionnum 低 4 位）
    pub fn version(&self) -> u16 {
        self.versionnum & XFS_SB_VERSION_NUMBITS
    }

    /// 是否为 v5（带 CRC）格式
    pub fn is_v5(&self) -> bool {
        self.version() == XFS_SB_VERSION_5
    }

    /// 不兼容特性位（仅 v5 有意义）
    pub fn incompat_features(&self) -> IncompatFeatures {
        if self.is_v5() {
            IncompatFeatures::from_bits_retain(self.features_incompat)
        } else {
            IncompatFeatures::empty()
        }
    }

    /// 目录项是否带文件类型字节
    pub fn has_ftype(&self) -> bool {
        if self.is_v5() {
            self.incompat_features().contains(IncompatFeatures::FTYPE)
        } else {
            (self.versionnum & XFS_SB_VERSION_MOREBITSBIT) != 0
                && (self.features2 & XFS_SB_VERSION2_FTYPE) != 0
        }
    }

    /// 获取卷名称（UTF-8 字符串）
    pub fn volume_name(&self) -> Option<&str> {
        // 找到第一个 null 字节
        let len = self
            .fname
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.fname.len());

        core::str::from_utf8(&self.fname[..len]).ok()
    }

    /// mkfs 是否未完成
    pub fn is_in_progress(&self) -> bool {
        self.inprogress != 0
    }
}
