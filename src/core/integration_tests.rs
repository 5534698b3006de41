//! Pipeline tests over in-memory images
//!
//! Exercises the interaction between:
//! - Trailer and section directory
//! - INODE and INODE_DIR parsing
//! - Tree building and path materialization

#[cfg(test)]
mod tests {
    use crate::core::config::{DecodeOptions, ROOT_INODE_ID};
    use crate::core::error::FsImageError;
    use crate::core::proto::{DirEntry, FileSummary, INode, INodeSection, Section};
    use crate::FsImage;
    use prost::Message;
    use std::io::Cursor;

    /// Assemble an image: INODE, INODE_DIR, summary, trailer
    fn build_image(inodes: &[(u64, &str, i32)], dirs: &[(u64, Vec<u64>)]) -> Vec<u8> {
        let mut image = Vec::new();

        let inode_start = image.len() as u64;
        image.extend(
            INodeSection {
                last_inode_id: inodes.iter().map(|i| i.0).max().unwrap_or(0),
                num_inodes: inodes.len() as u64,
            }
            .encode_length_delimited_to_vec(),
        );
        for (id, name, kind) in inodes {
            image.extend(
                INode {
                    kind: *kind,
                    id: *id,
                    name: name.as_bytes().to_vec(),
                }
                .encode_length_delimited_to_vec(),
            );
        }
        let inode_len = image.len() as u64 - inode_start;

        let dir_start = image.len() as u64;
        for (parent, children) in dirs {
            image.extend(
                DirEntry {
                    parent: *parent,
                    children: children.clone(),
                    ref_children: Vec::new(),
                }
                .encode_length_delimited_to_vec(),
            );
        }
        let dir_len = image.len() as u64 - dir_start;

        let summary = FileSummary {
            ondisk_version: 1,
            layout_version: 64,
            codec: None,
            sections: vec![
                Section {
                    name: "INODE".to_string(),
                    length: inode_len,
                    offset: inode_start,
                },
                Section {
                    name: "INODE_DIR".to_string(),
                    length: dir_len,
                    offset: dir_start,
                },
            ],
        }
        .encode_length_delimited_to_vec();
        image.extend_from_slice(&summary);
        image.extend_from_slice(&(summary.len() as i32).to_be_bytes());
        image
    }

    fn sample_image() -> Vec<u8> {
        build_image(
            &[
                (ROOT_INODE_ID, "", 2),
                (20, "a.txt", 1),
                (21, "b", 2),
                (22, "c.txt", 1),
            ],
            &[(ROOT_INODE_ID, vec![20, 21]), (21, vec![22])],
        )
    }

    #[test]
    fn test_minimal_image_workflow() {
        let image = FsImage::from_reader(Cursor::new(sample_image()), DecodeOptions::default())
            .unwrap();

        let counts = image.counts();
        assert_eq!((counts.files, counts.directories, counts.symlinks), (2, 2, 0));
        assert_eq!(counts.total(), image.inodes().declared);
        assert_eq!(image.node_count(), 4);
        assert_eq!(image.paths(), vec!["/a.txt", "/b/c.txt"]);
        assert_eq!(image.summary().layout_version, 64);
        assert!(image.path().is_none());
    }

    #[test]
    fn test_split_records_reach_the_tree() {
        let bytes = build_image(
            &[(ROOT_INODE_ID, "", 2), (20, "x", 1), (21, "y", 1)],
            &[(ROOT_INODE_ID, vec![20]), (ROOT_INODE_ID, vec![21])],
        );
        let image = FsImage::from_reader(Cursor::new(bytes), DecodeOptions::default()).unwrap();

        assert_eq!(image.adjacency()[&ROOT_INODE_ID], vec![20, 21]);
        assert_eq!(image.paths(), vec!["/x", "/y"]);
    }

    #[test]
    fn test_options_flow_through() {
        let options = DecodeOptions::new().include_directories(true);
        let image = FsImage::from_reader(Cursor::new(sample_image()), options).unwrap();
        assert_eq!(image.paths(), vec!["/a.txt", "/b", "/b/c.txt"]);
    }

    #[test]
    fn test_errors_carry_image_offsets() {
        let mut bytes = sample_image();
        // INODE section starts at 0; corrupt the first inode record's tag
        let header_len = bytes[0] as usize + 1;
        bytes[header_len + 1] = 0x0F;

        match FsImage::from_reader(Cursor::new(bytes), DecodeOptions::default()) {
            Err(FsImageError::RecordDecode { record, offset, .. }) => {
                assert_eq!(record, "INode");
                assert_eq!(offset, header_len as u64);
            }
            other => panic!("expected record decode error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compressed_image_rejected() {
        let summary = FileSummary {
            ondisk_version: 1,
            layout_version: 64,
            codec: Some("org.apache.hadoop.io.compress.SnappyCodec".to_string()),
            sections: Vec::new(),
        }
        .encode_length_delimited_to_vec();
        let mut bytes = summary.clone();
        bytes.extend_from_slice(&(summary.len() as i32).to_be_bytes());

        assert!(matches!(
            FsImage::from_reader(Cursor::new(bytes), DecodeOptions::default()),
            Err(FsImageError::UnsupportedCodec(_))
        ));
    }
}
