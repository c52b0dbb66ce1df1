//! 地址换算
//!
//! inode 编号与文件系统块号（FSB）都按 AG 打包：
//! - 高位：AG 编号
//! - 低位：AG 内的块号（inode 编号再多出块内序号）
//!
//! 拆分点由几何参数中的 log 字段决定。所有运算都做溢出检查，
//! 任何越界或溢出都返回 `OutOfRange`。

use crate::{
    consts::*,
    error::{Error, Result},
    superblock::Geometry,
};

/// inode cluster 配置
///
/// 不是 superblock 字段，而是部署参数：cluster 大于块大小且掩码非零时，
/// 同一 cluster 内的 inode 从 cluster 的第一个块开始寻址。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeCluster {
    /// cluster 大小（字节）
    pub size: u32,
    /// inode chunk 对齐掩码（以块为单位）
    pub align_mask: u32,
}

impl InodeCluster {
    /// 关闭 cluster 对齐
    pub const DISABLED: Self = Self {
        size: 0,
        align_mask: 0,
    };

    pub fn new(size: u32, align_mask: u32) -> Self {
        Self { size, align_mask }
    }

    /// 对给定几何是否生效
    pub fn is_active(&self, geom: &Geometry) -> bool {
        self.size > geom.block_size && self.align_mask != 0
    }
}

impl Default for InodeCluster {
    fn default() -> Self {
        Self {
            size: XFS_INODE_CLUSTER_SIZE,
            align_mask: XFS_INOALIGN_MASK,
        }
    }
}

/// inode 编号拆分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeLocation {
    /// AG 编号
    pub agno: u32,
    /// AG 内 inode 编号
    pub agino: u32,
    /// AG 内块号
    pub agbno: u32,
    /// 块内 inode 序号
    pub offset: u32,
}

fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn agino_bits(geom: &Geometry) -> Result<u32> {
    let bits = geom.ag_block_log as u32 + geom.inode_per_block_log as u32;
    if bits > 32 {
        return Err(Error::out_of_range("AG inode bits exceed 32"));
    }
    Ok(bits)
}

/// 拆分 inode 编号
///
/// 只做位运算拆分，不检查边界；边界由 [`inode_to_byte_offset`] 检查。
pub fn split_inode_number(geom: &Geometry, ino: u64) -> Result<InodeLocation> {
    let bits = agino_bits(geom)?;
    let inopb_log = geom.inode_per_block_log as u32;

    // AG 编号与 AG 内编号在磁盘格式中都是 32 位
    let agno = ino.checked_shr(bits).unwrap_or(0) as u32;
    let agino = (ino & mask(bits)) as u32;
    let agbno = agino >> inopb_log;
    let offset = (agino as u64 & mask(inopb_log)) as u32;

    Ok(InodeLocation {
        agno,
        agino,
        agbno,
        offset,
    })
}

/// 由 AG 编号与 AG 内编号组合 inode 编号
pub fn join_inode_number(geom: &Geometry, agno: u32, agino: u32) -> Result<u64> {
    let bits = agino_bits(geom)?;
    Ok(((agno as u64) << bits) | agino as u64)
}

/// 拆分文件系统块号，返回 (AG 编号, AG 内块号)
pub fn split_fsblock(geom: &Geometry, fsblock: u64) -> (u64, u64) {
    let bits = geom.ag_block_log as u32;
    (fsblock.checked_shr(bits).unwrap_or(0), fsblock & mask(bits))
}

/// AG 相对块地址转为字节偏移
///
/// 先换算为 512 字节扇区单位，再转为字节。
fn agb_to_byte(geom: &Geometry, agno: u64, agbno: u64) -> Result<u64> {
    let shift = (geom.block_log as u32)
        .checked_sub(XFS_BB_SHIFT)
        .ok_or_else(|| Error::out_of_range("block log below sector log"))?;

    let fsb = agno
        .checked_mul(geom.ag_blocks as u64)
        .and_then(|v| v.checked_add(agbno))
        .ok_or_else(|| Error::out_of_range("AG block address overflow"))?;

    let daddr = checked_shl(fsb, shift)?;
    daddr
        .checked_mul(XFS_BB_SIZE)
        .ok_or_else(|| Error::out_of_range("sector address overflow"))
}

fn checked_shl(value: u64, shift: u32) -> Result<u64> {
    if shift >= 64 || (shift > 0 && value >> (64 - shift) != 0) {
        return Err(Error::out_of_range("address shift overflow"));
    }
    Ok(value << shift)
}

/// 计算 inode 在文件系统区域内的字节偏移
///
/// # 参数
///
/// * `geom` - 几何描述
/// * `cluster` - inode cluster 配置
/// * `ino` - inode 编号
///
/// # 返回
///
/// 成功返回字节偏移；AG、块号或块内序号越界，或拆分后无法还原原编号时
/// 返回 `OutOfRange`
pub fn inode_to_byte_offset(geom: &Geometry, cluster: &InodeCluster, ino: u64) -> Result<u64> {
    let loc = split_inode_number(geom, ino)?;

    if loc.agno >= geom.ag_count
        || loc.agbno >= geom.ag_blocks
        || loc.offset >= geom.inodes_per_block as u32
        || join_inode_number(geom, loc.agno, loc.agino)? != ino
    {
        return Err(Error::out_of_range("bad inode number"));
    }

    let mut offset = loc.offset as u64;
    let cluster_agbno = if cluster.is_active(geom) {
        let blks_per_cluster = (cluster.size >> geom.block_log).max(1);
        let offset_agbno = loc.agbno & cluster.align_mask;
        let chunk_agbno = loc.agbno - offset_agbno;
        let cluster_agbno = chunk_agbno + (offset_agbno / blks_per_cluster) * blks_per_cluster;
        offset += (loc.agbno - cluster_agbno) as u64 * geom.inodes_per_block as u64;
        cluster_agbno
    } else {
        loc.agbno
    };

    let base = agb_to_byte(geom, loc.agno as u64, cluster_agbno as u64)?;
    let within = checked_shl(offset, geom.inode_log as u32)?;
    base.checked_add(within)
        .ok_or_else(|| Error::out_of_range("inode byte offset overflow"))
}

/// 计算文件系统块在文件系统区域内的字节偏移
pub fn block_to_byte_offset(geom: &Geometry, fsblock: u64) -> Result<u64> {
    let (agno, agbno) = split_fsblock(geom, fsblock);

    if agno >= geom.ag_count as u64 || agbno >= geom.ag_blocks as u64 {
        return Err(Error::out_of_range("bad filesystem block number"));
    }

    agb_to_byte(geom, agno, agbno)
}
