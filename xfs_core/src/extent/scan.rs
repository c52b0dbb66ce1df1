//! 数据 fork 中的 extent 列表扫描

use alloc::vec::Vec;
use log::{debug, warn};

use crate::{
    endian::Endian,
    error::{Error, Inconsistency, Result},
};

use super::Extent;

/// 扫描结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtentScan {
    pub extents: Vec<Extent>,
    /// 已找到 extent 的块数之和
    pub found_blocks: u64,
    /// 被跳过的块数为 0 的记录
    pub warnings: Vec<Inconsistency>,
}

impl ExtentScan {
    /// 累计块数是否达到声明值
    pub fn is_complete(&self, declared_blocks: u64) -> bool {
        self.found_blocks >= declared_blocks
    }
}

/// 扫描数据 fork 中的 extent 记录
///
/// 以下任一条件成立时停止：
/// - 累计块数达到 `declared_blocks`
/// - 遇到全零记录（fork 已耗尽也视为全零）
///
/// 块数为 0 的非零记录不算作 extent：跳过并记入 `warnings`。
///
/// 每次读取前都检查剩余字节，不会越过 `fork` 末尾；
/// 末尾残留不足一条且非零的记录返回 `Truncated`。
///
/// # 参数
///
/// * `fork` - 数据 fork 字节
/// * `endian` - 字段字节序
/// * `declared_blocks` - inode 记录的块数（nblocks）
pub fn scan_extents(fork: &[u8], endian: Endian, declared_blocks: u64) -> Result<ExtentScan> {
    let mut scan = ExtentScan::default();
    let mut pos = 0usize;

    let mut index = 0usize;
    while scan.found_blocks < declared_blocks {
        let rest = &fork[pos..];
        if rest.iter().take(Extent::SIZE).all(|&b| b == 0) {
            break;
        }
        if rest.len() < Extent::SIZE {
            return Err(Error::truncated("extent record crosses end of data fork"));
        }
        let rec = &rest[..Extent::SIZE];

        let ext = Extent::unpack(rec, endian)?;
        pos += Extent::SIZE;
        index += 1;

        if ext.blockcount == 0 {
            let issue = Inconsistency::EmptyExtentRecord {
                index: index - 1,
                startoff: ext.startoff,
            };
            warn!("{}", issue);
            scan.warnings.push(issue);
            continue;
        }

        scan.found_blocks = scan.found_blocks.saturating_add(ext.blockcount as u64);
        scan.extents.push(ext);
    }

    debug!(
        "scan_extents: fork_len={}, declared={}, found={}, count={}",
        fork.len(),
        declared_blocks,
        scan.found_blocks,
        scan.extents.len()
    );

    Ok(scan)
}
