//! 测试用镜像构造工具
//!
//! 几何参数固定为：4096 字节块、512 字节 inode（每块 8 个）、
//! 每个 AG 16 块、共 2 个 AG。inode 编号低 3 位为块内序号，
//! 接下来 4 位为 AG 内块号，其余为 AG 编号。

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder};
use xfs_core::{Extent, Endian};

pub const BLOCK_SIZE: usize = 4096;
pub const INODE_SIZE: usize = 512;
pub const AG_BLOCKS: u64 = 16;
pub const AG_COUNT: u64 = 2;
pub const ROOT_INO: u64 = 16;
pub const FS_UUID: [u8; 16] = [
    0x4a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f, 0x60, 0x71, 0x82, 0x93, 0xa4, 0xb5, 0xc6, 0xd7, 0xe8,
    0xf9,
];

pub const MODE_DIR: u16 = 0o040755;
pub const MODE_REG: u16 = 0o100644;
pub const MODE_LNK: u16 = 0o120777;

pub const FMT_LOCAL: u8 = 1;
pub const FMT_EXTENTS: u8 = 2;

/// 按固定几何计算 inode 字节偏移
pub fn inode_offset(ino: u64) -> usize {
    let agno = ino >> 7;
    let agbno = (ino >> 3) & 0xF;
    let slot = ino & 0x7;
    ((agno * AG_BLOCKS + agbno) as usize) * BLOCK_SIZE + slot as usize * INODE_SIZE
}

/// 按固定几何计算文件系统块字节偏移
pub fn block_offset(fsblock: u64) -> usize {
    let agno = fsblock >> 4;
    let agbno = fsblock & 0xF;
    ((agno * AG_BLOCKS + agbno) as usize) * BLOCK_SIZE
}

/// 由 AG 编号与 AG 内块号组合文件系统块号
pub fn fsblock(agno: u64, agbno: u64) -> u64 {
    (agno << 4) | agbno
}

/// v5 superblock（大端，带 ftype）
pub fn superblock_bytes() -> Vec<u8> {
    let mut buf = vec![0u8; 512];
    BigEndian::write_u32(&mut buf[0..], 0x5846_5342);
    BigEndian::write_u32(&mut buf[4..], BLOCK_SIZE as u32);
    BigEndian::write_u64(&mut buf[8..], AG_BLOCKS * AG_COUNT);
    buf[32..48].copy_from_slice(&FS_UUID);
    BigEndian::write_u64(&mut buf[56..], ROOT_INO);
    BigEndian::write_u32(&mut buf[84..], AG_BLOCKS as u32);
    BigEndian::write_u32(&mut buf[88..], AG_COUNT as u32);
    BigEndian::write_u16(&mut buf[100..], 5);
    BigEndian::write_u16(&mut buf[102..], 512);
    BigEndian::write_u16(&mut buf[104..], INODE_SIZE as u16);
    BigEndian::write_u16(&mut buf[106..], 8);
    buf[108..115].copy_from_slice(b"testvol");
    buf[120] = 12;
    buf[121] = 9;
    buf[122] = 9;
    buf[123] = 3;
    buf[124] = 4;
    BigEndian::write_u64(&mut buf[128..], 64);
    BigEndian::write_u64(&mut buf[136..], 58);
    // sb_features_incompat: FTYPE
    BigEndian::write_u32(&mut buf[216..], 1);
    buf
}

/// v3 inode（大端）
pub fn inode_bytes(mode: u16, format: u8, size: u64, nblocks: u64, ino: u64) -> Vec<u8> {
    let mut buf = vec![0u8; INODE_SIZE];
    BigEndian::write_u16(&mut buf[0..], 0x494E);
    BigEndian::write_u16(&mut buf[2..], mode);
    buf[4] = 3;
    buf[5] = format;
    BigEndian::write_u32(&mut buf[8..], 1000);
    BigEndian::write_u32(&mut buf[12..], 1000);
    BigEndian::write_u32(&mut buf[16..], 1);
    BigEndian::write_u32(&mut buf[32..], 1_700_000_000);
    BigEndian::write_u32(&mut buf[40..], 1_700_000_100);
    BigEndian::write_u32(&mut buf[48..], 1_700_000_200);
    BigEndian::write_u64(&mut buf[56..], size);
    BigEndian::write_u64(&mut buf[64..], nblocks);
    BigEndian::write_u32(&mut buf[144..], 1_600_000_000);
    BigEndian::write_u64(&mut buf[152..], ino);
    buf[160..176].copy_from_slice(&FS_UUID);
    buf
}

/// 把数据 fork 写到 v3 inode core 之后
pub fn with_fork(mut inode: Vec<u8>, fork: &[u8]) -> Vec<u8> {
    inode[176..176 + fork.len()].copy_from_slice(fork);
    inode
}

/// extent 格式 inode，同时写入 nextents
pub fn extent_inode(mode: u16, size: u64, ino: u64, extents: &[Extent]) -> Vec<u8> {
    let nblocks = extents.iter().map(|e| e.blockcount as u64).sum();
    let mut inode = inode_bytes(mode, FMT_EXTENTS, size, nblocks, ino);
    BigEndian::write_u32(&mut inode[76..], extents.len() as u32);
    with_fork(inode, &pack_extents(extents))
}

pub fn pack_extents(extents: &[Extent]) -> Vec<u8> {
    extents.iter().flat_map(|e| e.pack(Endian::Big)).collect()
}

/// 短格式目录 fork：(名字, 文件类型, inode 编号)，4 字节 inode 编号
pub fn shortform_fork(parent: u64, entries: &[(&[u8], u8, u64)]) -> Vec<u8> {
    let mut fork = vec![entries.len() as u8, 0];
    fork.extend_from_slice(&(parent as u32).to_be_bytes());

    let mut offset = 0x60u16;
    for (name, ftype, ino) in entries {
        fork.push(name.len() as u8);
        fork.extend_from_slice(&offset.to_be_bytes());
        fork.extend_from_slice(name);
        fork.push(*ftype);
        fork.extend_from_slice(&(*ino as u32).to_be_bytes());
        offset += 16;
    }
    fork
}

/// XDB3 单块目录：(inode 编号, 名字, 文件类型)
pub fn block_dir(owner: u64, entries: &[(u64, &[u8], u8)]) -> Vec<u8> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    BigEndian::write_u32(&mut buf[0..], 0x5844_4233);
    BigEndian::write_u64(&mut buf[40..], owner);
    buf[24..40].copy_from_slice(&FS_UUID);

    let mut at = 64;
    for (ino, name, ftype) in entries {
        BigEndian::write_u64(&mut buf[at..], *ino);
        buf[at + 8] = name.len() as u8;
        buf[at + 9..at + 9 + name.len()].copy_from_slice(name);
        buf[at + 9 + name.len()] = *ftype;
        let size = (19 + name.len()) & !7;
        BigEndian::write_u16(&mut buf[at + size - 2..], at as u16);
        at += size;
    }

    // 剩余数据区标为空闲
    let leaf_start = BLOCK_SIZE - 8 - entries.len() * 8;
    BigEndian::write_u16(&mut buf[at..], 0xFFFF);
    BigEndian::write_u16(&mut buf[at + 2..], (leaf_start - at) as u16);
    BigEndian::write_u32(&mut buf[BLOCK_SIZE - 8..], entries.len() as u32);
    buf
}

/// 内存镜像构造器
pub struct ImageBuilder {
    image: Vec<u8>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        let mut image = vec![0u8; BLOCK_SIZE * (AG_BLOCKS * AG_COUNT) as usize];
        image[..512].copy_from_slice(&superblock_bytes());
        Self { image }
    }

    pub fn inode(mut self, ino: u64, bytes: &[u8]) -> Self {
        let at = inode_offset(ino);
        self.image[at..at + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn block(mut self, fsblock: u64, bytes: &[u8]) -> Self {
        let at = block_offset(fsblock);
        self.image[at..at + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.image
    }
}

/// 标准测试卷
///
/// ```text
/// /            ino 16  短格式目录
/// ├── etc      ino 17  单块目录，目录块在 AG1 第 3 块
/// │   └── passwd  ino 162
/// ├── hello.txt   ino 18  两个 extent
/// └── link     ino 19  内联符号链接 -> hello.txt
/// ```
pub fn sample_volume() -> Vec<u8> {
    let root = with_fork(
        inode_bytes(MODE_DIR, FMT_LOCAL, 60, 0, ROOT_INO),
        &shortform_fork(
            ROOT_INO,
            &[
                (&b"etc"[..], 2, 17),
                (&b"hello.txt"[..], 1, 18),
                (&b"link"[..], 7, 19),
            ],
        ),
    );
    let etc = extent_inode(
        MODE_DIR,
        BLOCK_SIZE as u64,
        17,
        &[Extent::new(false, 0, fsblock(1, 3), 1)],
    );
    let hello = extent_inode(
        MODE_REG,
        3 * BLOCK_SIZE as u64 - 100,
        18,
        &[
            Extent::new(false, 0, fsblock(0, 5), 2),
            Extent::new(false, 2, fsblock(1, 8), 1),
        ],
    );
    let link = with_fork(inode_bytes(MODE_LNK, FMT_LOCAL, 9, 0, 19), b"hello.txt");
    let passwd = extent_inode(
        MODE_REG,
        512,
        162,
        &[Extent::new(false, 0, fsblock(1, 9), 1)],
    );

    ImageBuilder::new()
        .inode(ROOT_INO, &root)
        .inode(17, &etc)
        .inode(18, &hello)
        .inode(19, &link)
        .inode(162, &passwd)
        .block(
            fsblock(1, 3),
            &block_dir(17, &[
                    (17, &b"."[..], 2),
                    (ROOT_INO, &b".."[..], 2),
                    (162, &b"passwd"[..], 1),
                ]),
        )
        .build()
}
