//! 内存镜像上的文件系统访问测试
//!
//! 覆盖 XfsFilesystem 的完整读取路径：
//! - open - superblock 探测与几何派生
//! - read_inode / read_dir - 短格式目录与单块目录
//! - data_runs - extent 的字节级位置

mod common;

use common::*;
use xfs_core::{
    DataRun, DirFileType, Endian, ErrorKind, FsConfig, Inconsistency, InodeFormat, InodePayload,
    InodeType, MismatchPolicy, XfsFilesystem,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn open_sample() -> XfsFilesystem<Vec<u8>> {
        XfsFilesystem::open(sample_volume(), FsConfig::default()).unwrap()
    }

    fn names(entries: &[xfs_core::DirEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name_lossy()).collect()
    }

    #[test]
    fn test_open_volume() {
        println!("\n=== 测试 1: 打开卷 ===");

        let fs = open_sample();
        assert_eq!(fs.endian(), Endian::Big);

        let geom = fs.geometry();
        assert_eq!(geom.block_size, 4096);
        assert_eq!(geom.inode_size, 512);
        assert_eq!(geom.ag_blocks, 16);
        assert_eq!(geom.ag_count, 2);
        assert_eq!(geom.root_ino, ROOT_INO);
        assert!(geom.has_ftype);
        assert_eq!(geom.uuid, "4A1B2C3D-4E5F-6071-8293-A4B5C6D7E8F9");

        let sb = fs.superblock();
        assert!(sb.is_v5());
        assert_eq!(sb.volume_name(), Some("testvol"));
        assert_eq!(sb.icount, 64);
        assert_eq!(sb.ifree, 58);

        println!("✓ 卷几何解析正确");
    }

    #[test]
    fn test_read_root_dir() {
        println!("\n=== 测试 2: 短格式根目录 ===");

        let mut fs = open_sample();
        let root = fs.read_root_dir().unwrap();

        assert_eq!(root.parent, Some(ROOT_INO));
        assert_eq!(names(&root.entries), ["etc", "hello.txt", "link"]);
        assert_eq!(
            root.entries.iter().map(|e| e.inumber).collect::<Vec<_>>(),
            [17, 18, 19]
        );
        assert_eq!(root.entries[0].file_type, DirFileType::Directory);
        assert_eq!(root.entries[1].file_type, DirFileType::RegularFile);
        assert_eq!(root.entries[2].file_type, DirFileType::Symlink);
        assert!(root.warnings.is_empty());

        println!("✓ 根目录 {} 项", root.entries.len());
    }

    #[test]
    fn test_read_block_dir() {
        println!("\n=== 测试 3: 单块目录 ===");

        let mut fs = open_sample();
        let etc = fs.read_dir(17).unwrap();

        assert_eq!(etc.parent, None);
        assert_eq!(names(&etc.entries), [".", "..", "passwd"]);
        assert_eq!(etc.entries[1].inumber, ROOT_INO);
        assert!(etc.warnings.is_empty());

        let passwd = fs.read_inode(etc.entries[2].inumber).unwrap();
        assert_eq!(passwd.ino, 162);
        assert_eq!(passwd.inode_type, InodeType::RegularFile);
        assert_eq!(passwd.size, 512);

        let block = fs.read_dir_block(fsblock(1, 3)).unwrap();
        assert!(block.header.is_block_form());
        assert_eq!(block.header.v3.as_ref().map(|v3| v3.owner), Some(17));

        println!("✓ /etc 解析正确");
    }

    #[test]
    fn test_file_extents_and_runs() {
        println!("\n=== 测试 4: extent 与数据区间 ===");

        let mut fs = open_sample();
        let hello = fs.read_inode(18).unwrap();

        assert_eq!(hello.format, InodeFormat::Extents);
        assert_eq!(hello.nblocks, 3);
        assert_eq!(hello.extents().map(|e| e.len()), Some(2));
        assert!(hello.warnings.is_empty());

        let runs = fs.data_runs(&hello).unwrap();
        assert_eq!(
            runs,
            vec![
                DataRun {
                    logical_offset: 0,
                    physical_offset: 5 * 4096,
                    length: 2 * 4096,
                    unwritten: false,
                },
                DataRun {
                    logical_offset: 2 * 4096,
                    physical_offset: (16 + 8) * 4096,
                    length: 4096,
                    unwritten: false,
                },
            ]
        );

        // 非 extent 格式没有数据区间
        let link = fs.read_inode(19).unwrap();
        assert!(fs.data_runs(&link).unwrap().is_empty());

        println!("✓ {} 个数据区间", runs.len());
    }

    #[test]
    fn test_inline_symlink() {
        let mut fs = open_sample();
        let link = fs.read_inode(19).unwrap();

        assert!(link.is_symlink());
        assert_eq!(link.payload, InodePayload::Symlink(b"hello.txt".to_vec()));
    }

    #[test]
    fn test_region_offset() {
        let mut image = vec![0u8; 8192];
        image.extend_from_slice(&sample_volume());

        let config = FsConfig {
            region_offset: 8192,
            ..FsConfig::default()
        };
        let mut fs = XfsFilesystem::open(image.as_slice(), config).unwrap();
        assert_eq!(names(&fs.read_dir(17).unwrap().entries), [".", "..", "passwd"]);

        // 不带偏移时镜像起点不是 superblock
        let err = XfsFilesystem::open(image.as_slice(), FsConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::BadMagic);
    }

    #[test]
    fn test_bad_inode_numbers() {
        let mut fs = open_sample();

        // AG 2 不存在
        let err = fs.read_inode(2 << 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        // 0 号 inode 的位置是 superblock
        let err = fs.read_inode(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadMagic);

        // 未写入的槽位
        let err = fs.read_inode(20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadMagic);
    }

    #[test]
    fn test_inode_number_mismatch() {
        // 槽位 20 里存放的 inode 声称自己是 21
        let image = ImageBuilder::new()
            .inode(20, &inode_bytes(MODE_REG, FMT_EXTENTS, 0, 0, 21))
            .build();

        let mut fs = XfsFilesystem::open(image.clone(), FsConfig::default()).unwrap();
        let inode = fs.read_inode(20).unwrap();
        assert_eq!(inode.ino, 20);
        assert_eq!(
            inode.warnings,
            vec![Inconsistency::InodeNumberMismatch {
                requested: 20,
                recorded: 21,
            }]
        );

        let config = FsConfig {
            mismatch_policy: MismatchPolicy::Reject,
            ..FsConfig::default()
        };
        let mut fs = XfsFilesystem::open(image, config).unwrap();
        assert_eq!(fs.read_inode(20).unwrap_err().kind(), ErrorKind::Inconsistent);
    }

    #[test]
    fn test_read_dir_rejects_files() {
        let mut fs = open_sample();
        let err = fs.read_dir(18).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_truncated_image() {
        let mut image = sample_volume();
        image.truncate(block_offset(fsblock(1, 0)));

        let mut fs = XfsFilesystem::open(image, FsConfig::default()).unwrap();
        // 根目录在 AG0 内，仍可读取
        assert_eq!(fs.read_root_dir().unwrap().entries.len(), 3);
        // /etc 的目录块在 AG1，镜像已截断
        assert_eq!(fs.read_dir(17).unwrap_err().kind(), ErrorKind::Truncated);

        let err = XfsFilesystem::open(vec![0u8; 100], FsConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_read_statistics() {
        let mut fs = open_sample();
        assert_eq!(fs.reader().read_count(), 1);

        fs.read_dir(17).unwrap();
        // inode + 一个目录块
        assert_eq!(fs.reader().read_count(), 3);
        assert_eq!(fs.reader().bytes_read(), 512 + 512 + 4096);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_source() {
        use std::io::Write;

        let path = std::env::temp_dir().join(format!("xfs_core_volume_{}.img", std::process::id()));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&sample_volume())
            .unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut fs = XfsFilesystem::open(file, FsConfig::default()).unwrap();
        assert_eq!(fs.read_root_dir().unwrap().entries.len(), 3);

        std::fs::remove_file(&path).unwrap();
    }
}
