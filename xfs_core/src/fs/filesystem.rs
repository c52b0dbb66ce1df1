//! XFS 文件系统只读访问

use alloc::vec::Vec;
use log::{debug, warn};

use crate::{
    address::{block_to_byte_offset, inode_to_byte_offset, InodeCluster},
    block::{ImageReader, ImageSource},
    consts::*,
    dir::{decode_dir_block, DirBlock, DirBlockOptions, DirEntry},
    endian::Endian,
    error::{Error, ErrorKind, Inconsistency, Result},
    extent::DataRun,
    inode::{decode_inode, InodeDecodeOptions, InodePayload, InodeRecord, MismatchPolicy},
    superblock::{decode_superblock, probe_endian, Geometry, Superblock},
};

/// 文件系统访问配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    /// inode cluster 对齐参数
    pub cluster: InodeCluster,
    /// inode 编号不一致时的处理策略
    pub mismatch_policy: MismatchPolicy,
    /// 文件系统区域在镜像内的起始偏移（字节）
    pub region_offset: u64,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            cluster: InodeCluster::default(),
            mismatch_policy: MismatchPolicy::Warn,
            region_offset: 0,
        }
    }
}

/// 一个目录的全部目录项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirContents {
    /// 短格式目录头中的父目录；块形式目录的父目录在 `..` 项中
    pub parent: Option<u64>,
    pub entries: Vec<DirEntry>,
    /// 目录 inode 与各目录块的软性不一致
    pub warnings: Vec<Inconsistency>,
}

/// XFS 文件系统
///
/// 持有镜像源、superblock 与几何参数，按 inode 编号与块号读取并解码元数据。
///
/// # 示例
///
/// ```rust,ignore
/// use xfs_core::{FsConfig, XfsFilesystem};
///
/// let image = std::fs::File::open("disk.img")?;
/// let mut fs = XfsFilesystem::open(image, FsConfig::default())?;
///
/// let root = fs.geometry().root_ino;
/// for entry in fs.read_dir(root)?.entries {
///     println!("{} -> {}", entry.name_lossy(), entry.inumber);
/// }
/// ```
pub struct XfsFilesystem<S> {
    reader: ImageReader<S>,
    config: FsConfig,
    endian: Endian,
    sb: Superblock,
    geom: Geometry,
}

impl<S: ImageSource> XfsFilesystem<S> {
    /// 打开文件系统
    ///
    /// 读取区域起点的 superblock，探测字节序并派生几何参数。
    ///
    /// # 错误
    ///
    /// - `ErrorKind::BadMagic` - superblock 魔数不符
    /// - `ErrorKind::Truncated` - 镜像不足一个 superblock
    /// - `ErrorKind::Corrupted` - 几何参数不可用
    /// - `ErrorKind::Io` - 镜像源读取失败
    pub fn open(source: S, config: FsConfig) -> Result<Self> {
        let mut reader = ImageReader::with_region_offset(source, config.region_offset);
        let buf = reader.read_exact(XFS_SB_OFFSET, XFS_SB_SIZE)?;

        let endian = probe_endian(&buf)?;
        let sb = decode_superblock(&buf, endian)?;
        let geom = Geometry::from_superblock(&sb)?;
        if sb.is_in_progress() {
            warn!("XfsFilesystem::open: mkfs did not finish on this volume");
        }

        debug!(
            "XfsFilesystem::open: endian={:?}, block_size={}, ag_count={}, root_ino={}",
            endian, geom.block_size, geom.ag_count, geom.root_ino
        );

        Ok(Self {
            reader,
            config,
            endian,
            sb,
            geom,
        })
    }

    /// 获取 superblock 引用
    pub fn superblock(&self) -> &Superblock {
        &self.sb
    }

    /// 获取几何参数引用
    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    /// 探测到的字节序
    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// 获取镜像读取器引用
    pub fn reader(&self) -> &ImageReader<S> {
        &self.reader
    }

    /// 取回镜像源
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    /// 读取并解码 inode
    ///
    /// # 参数
    ///
    /// * `ino` - inode 编号
    ///
    /// # 返回
    ///
    /// 成功返回 `InodeRecord`；编号越界返回 `OutOfRange`
    pub fn read_inode(&mut self, ino: u64) -> Result<InodeRecord> {
        let offset = inode_to_byte_offset(&self.geom, &self.config.cluster, ino)?;
        debug!("read_inode: ino={}, offset={}", ino, offset);

        let buf = self.reader.read_exact(offset, self.geom.inode_size as usize)?;
        let opts = InodeDecodeOptions::from_geometry(&self.geom)
            .with_mismatch_policy(self.config.mismatch_policy);
        decode_inode(&buf, self.endian, Some(ino), &opts)
    }

    /// 读取并解码一个目录块
    ///
    /// # 参数
    ///
    /// * `fsblock` - 目录块首个文件系统块号
    pub fn read_dir_block(&mut self, fsblock: u64) -> Result<DirBlock> {
        let offset = block_to_byte_offset(&self.geom, fsblock)?;
        debug!("read_dir_block: fsblock={}, offset={}", fsblock, offset);

        let opts = DirBlockOptions::from_geometry(&self.geom);
        let buf = self.reader.read_exact(offset, opts.block_size)?;
        decode_dir_block(&buf, self.endian, &opts)
    }

    /// 读取一个目录的全部目录项
    ///
    /// 短格式目录直接取 inode 负载；extent 格式目录逐个解码数据段
    /// （逻辑偏移低于 leaf 段）的目录块。
    ///
    /// # 错误
    ///
    /// - `ErrorKind::UnsupportedFormat` - 不是目录，或目录为 B+ 树格式
    pub fn read_dir(&mut self, ino: u64) -> Result<DirContents> {
        let inode = self.read_inode(ino)?;
        if !inode.is_dir() {
            return Err(Error::new(
                ErrorKind::UnsupportedFormat,
                "inode is not a directory",
            ));
        }

        let mut contents = DirContents {
            warnings: inode.warnings,
            ..DirContents::default()
        };

        match inode.payload {
            InodePayload::Shortform(sf) => {
                contents.parent = Some(sf.parent);
                contents.entries = sf.entries;
            }
            InodePayload::Extents(extents) => {
                // leaf 段起点（文件系统块单位）
                let leaf_fsb = XFS_DIR2_LEAF_OFFSET >> self.geom.block_log;
                let step = self.geom.dir_block_fsbs();

                for ext in extents {
                    let mut i = 0u64;
                    while i < ext.blockcount as u64 {
                        let logical = ext.startoff + i;
                        if logical >= leaf_fsb {
                            break;
                        }
                        let fsblock = ext
                            .map_block(logical)
                            .ok_or_else(|| Error::out_of_range("directory block overflow"))?;

                        let block = self.read_dir_block(fsblock)?;
                        contents.entries.extend(block.entries);
                        contents.warnings.extend(block.warnings);
                        i += step;
                    }
                }
            }
            InodePayload::Empty => {}
            _ => {
                return Err(Error::new(
                    ErrorKind::UnsupportedFormat,
                    "directory format not supported",
                ));
            }
        }

        Ok(contents)
    }

    /// 根目录的全部目录项
    pub fn read_root_dir(&mut self) -> Result<DirContents> {
        let root = self.geom.root_ino;
        self.read_dir(root)
    }

    /// 计算 inode 各 extent 的字节级位置
    ///
    /// 非 extent 格式返回空列表。
    pub fn data_runs(&self, inode: &InodeRecord) -> Result<Vec<DataRun>> {
        inode
            .extents()
            .unwrap_or(&[])
            .iter()
            .map(|ext| ext.to_data_run(&self.geom))
            .collect()
    }
}
