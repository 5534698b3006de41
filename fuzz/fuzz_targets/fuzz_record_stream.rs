#![no_main]
use fsimage_rs::{parse_inode_dir_section, parse_inode_section, DecodeOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = parse_inode_section(data, &DecodeOptions::default()) {
        assert_eq!(table.counts.total(), table.nodes.len() as u64);
    }

    if let Ok(adjacency) = parse_inode_dir_section(data) {
        let children: usize = adjacency.values().map(Vec::len).sum();
        assert!(children <= data.len());
    }
});
