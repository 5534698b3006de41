#![no_main]
use fsimage_rs::{DecodeOptions, FsImage};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

// Arbitrary bytes must decode or fail with an error, never panic
fuzz_target!(|data: &[u8]| {
    let options = DecodeOptions::new().max_depth(256);
    if let Ok(image) = FsImage::from_reader(Cursor::new(data), options) {
        let paths = image.paths();
        assert_eq!(paths.len(), image.root().path_leaf_count());
    }
});
