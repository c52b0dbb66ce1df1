//! 打包 extent 记录

use crate::{
    address::block_to_byte_offset,
    consts::*,
    endian::{read_u64, Endian},
    error::{Error, Result},
    superblock::Geometry,
};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

const STARTOFF_MASK: u64 = (1 << XFS_BMBT_STARTOFF_BITS) - 1;
const STARTBLOCK_MASK: u64 = (1 << XFS_BMBT_STARTBLOCK_BITS) - 1;
const BLOCKCOUNT_MASK: u64 = (1 << XFS_BMBT_BLOCKCOUNT_BITS) - 1;

/// startblock 在第一个 64 位字中占低 9 位
const STARTBLOCK_HI_BITS: u32 = 9;

/// 解码后的 extent
///
/// 128 位记录布局（按两个 64 位字读取）：
/// ```text
/// +-------+------------------+------------------+---------------+
/// | 1 bit | 54 bits          | 52 bits          | 21 bits       |
/// +-------+------------------+------------------+---------------+
/// | flag  | startoff         | startblock       | blockcount    |
/// +-------+------------------+------------------+---------------+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    /// 未写入（预分配）标志
    pub unwritten: bool,
    /// 文件内逻辑块号
    pub startoff: u64,
    /// 起始文件系统块号（按 AG 打包）
    pub startblock: u64,
    /// 块数
    pub blockcount: u32,
}

impl Extent {
    /// 打包记录大小
    pub const SIZE: usize = XFS_BMBT_REC_SIZE;

    pub fn new(unwritten: bool, startoff: u64, startblock: u64, blockcount: u32) -> Self {
        Self {
            unwritten,
            startoff,
            startblock,
            blockcount,
        }
    }

    /// 从 16 字节记录解码
    ///
    /// # 参数
    ///
    /// * `rec` - 记录字节，至少 16 字节
    /// * `endian` - 字段字节序
    pub fn unpack(rec: &[u8], endian: Endian) -> Result<Self> {
        if rec.len() < Self::SIZE {
            return Err(Error::truncated("extent record shorter than 16 bytes"));
        }

        let l0 = read_u64(endian, &rec[0..8]);
        let l1 = read_u64(endian, &rec[8..16]);
        let split = XFS_BMBT_STARTBLOCK_BITS - STARTBLOCK_HI_BITS;

        Ok(Self {
            unwritten: l0 >> 63 != 0,
            startoff: (l0 >> STARTBLOCK_HI_BITS) & STARTOFF_MASK,
            startblock: ((l0 & ((1 << STARTBLOCK_HI_BITS) - 1)) << split)
                | (l1 >> XFS_BMBT_BLOCKCOUNT_BITS),
            blockcount: (l1 & BLOCKCOUNT_MASK) as u32,
        })
    }

    /// 打包为 16 字节记录
    ///
    /// 超出字段宽度的高位被截掉。
    pub fn pack(&self, endian: Endian) -> [u8; Self::SIZE] {
        let startblock = self.startblock & STARTBLOCK_MASK;
        let split = XFS_BMBT_STARTBLOCK_BITS - STARTBLOCK_HI_BITS;

        let l0 = ((self.unwritten as u64) << 63)
            | ((self.startoff & STARTOFF_MASK) << STARTBLOCK_HI_BITS)
            | (startblock >> split);
        let l1 = ((startblock & ((1 << split) - 1)) << XFS_BMBT_BLOCKCOUNT_BITS)
            | (self.blockcount as u64 & BLOCKCOUNT_MASK);

        let mut rec = [0u8; Self::SIZE];
        match endian {
            Endian::Big => {
                BigEndian::write_u64(&mut rec[0..8], l0);
                BigEndian::write_u64(&mut rec[8..16], l1);
            }
            Endian::Little => {
                LittleEndian::write_u64(&mut rec[0..8], l0);
                LittleEndian::write_u64(&mut rec[8..16], l1);
            }
        }
        rec
    }

    /// 逻辑结束块号（不含）
    pub fn logical_end(&self) -> u64 {
        self.startoff.saturating_add(self.blockcount as u64)
    }

    /// 逻辑块是否落在本 extent 内
    pub fn contains(&self, logical_block: u64) -> bool {
        logical_block >= self.startoff && logical_block < self.logical_end()
    }

    /// 逻辑块号映射为文件系统块号
    ///
    /// 单个 extent 不跨 AG，因此可以直接在打包的块号上做加法。
    pub fn map_block(&self, logical_block: u64) -> Option<u64> {
        if !self.contains(logical_block) {
            return None;
        }
        self.startblock.checked_add(logical_block - self.startoff)
    }

    /// 换算为字节级数据区间
    pub fn to_data_run(&self, geom: &Geometry) -> Result<DataRun> {
        let shift = geom.block_log as u32;
        let overflow = || Error::out_of_range("extent byte range overflow");

        let logical_offset = self.startoff.checked_mul(1 << shift).ok_or_else(overflow)?;
        let length = (self.blockcount as u64) << shift;
        let physical_offset = block_to_byte_offset(geom, self.startblock)?;

        Ok(DataRun {
            logical_offset,
            physical_offset,
            length,
            unwritten: self.unwritten,
        })
    }
}

/// 一个 extent 的字节级位置
///
/// 偏移都相对文件系统区域起点；调用者据此自行读取数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRun {
    /// 文件内字节偏移
    pub logical_offset: u64,
    /// 文件系统区域内字节偏移
    pub physical_offset: u64,
    /// 字节长度
    pub length: u64,
    pub unwritten: bool,
}
