//! 目录项

use alloc::{string::String, vec::Vec};

use crate::types::DirFileType;

/// 目录项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub inumber: u64,
    /// 原始名字字节，长度与磁盘上的 namelen 一致
    pub name: Vec<u8>,
    pub file_type: DirFileType,
    /// 块形式：项在块内的偏移；短格式：offset 字段
    pub tag: u16,
}

impl DirEntry {
    /// 名字按 UTF-8 解释
    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.name).ok()
    }

    /// 名字的有损字符串形式
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// 是否为 `.` 或 `..`
    pub fn is_dot_or_dotdot(&self) -> bool {
        self.name == b"." || self.name == b".."
    }
}

/// 数据块目录项的固定部分：inumber(8) + namelen(1) + tag(2)
const DATA_ENTRY_FIXED: usize = 8 + 1 + 2;

/// 数据块目录项总大小（含 tag），按 8 字节对齐
pub fn data_entry_size(namelen: usize, has_ftype: bool) -> usize {
    (DATA_ENTRY_FIXED + namelen + has_ftype as usize + 7) & !7
}

/// 带文件类型字节时 name/filetype 与 tag 之间的填充长度
pub fn data_entry_padding(namelen: usize) -> usize {
    ((19 + namelen) & !7) - (12 + namelen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_entry_size() {
        // "." 项: 8+1+1+1+2 = 13 -> 16
        assert_eq!(data_entry_size(1, true), 16);
        assert_eq!(data_entry_size(4, true), 16);
        assert_eq!(data_entry_size(5, true), 24);
        assert_eq!(data_entry_size(5, false), 16);
        assert_eq!(data_entry_size(255, true), 272);
    }

    #[test]
    fn test_padding_matches_size() {
        for namelen in 0..=255 {
            let size = data_entry_size(namelen, true);
            assert_eq!(size, (19 + namelen) & !7);
            assert_eq!(size, 8 + 1 + namelen + 1 + data_entry_padding(namelen) + 2);
            assert!(data_entry_padding(namelen) < 8);
        }
    }

    #[test]
    fn test_names() {
        let entry = DirEntry {
            inumber: 1,
            name: b"..".to_vec(),
            file_type: DirFileType::Directory,
            tag: 0,
        };
        assert!(entry.is_dot_or_dotdot());
        assert_eq!(entry.name_str(), Some(".."));

        let raw = DirEntry {
            name: vec![0xFF, b'a'],
            ..entry
        };
        assert!(!raw.is_dot_or_dotdot());
        assert_eq!(raw.name_str(), None);
        assert_eq!(raw.name_lossy(), "\u{FFFD}a");
    }
}
