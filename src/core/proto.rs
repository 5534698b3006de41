//! Record schemas stored in an fsimage
//!
//! Only the fields needed to rebuild the namespace are declared; everything
//! else on the wire is skipped by the decoder.

/// Directory of sections, stored just before the trailer
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileSummary {
    #[prost(uint32, tag = "1")]
    pub ondisk_version: u32,

    #[prost(uint32, tag = "2")]
    pub layout_version: u32,

    /// Compression codec applied to every section, if any
    #[prost(string, optional, tag = "3")]
    pub codec: Option<String>,

    #[prost(message, repeated, tag = "4")]
    pub sections: Vec<Section>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Section {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(uint64, tag = "2")]
    pub length: u64,

    #[prost(uint64, tag = "3")]
    pub offset: u64,
}

/// Leading record of the INODE section
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct INodeSection {
    #[prost(uint64, tag = "1")]
    pub last_inode_id: u64,

    /// Number of inode records that follow
    #[prost(uint64, tag = "2")]
    pub num_inodes: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct INode {
    /// 1 = file, 2 = directory, 3 = symlink
    #[prost(int32, tag = "1")]
    pub kind: i32,

    #[prost(uint64, tag = "2")]
    pub id: u64,

    #[prost(bytes = "vec", tag = "3")]
    pub name: Vec<u8>,
}

/// One parent and (a chunk of) its children, from the INODE_DIR section
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DirEntry {
    #[prost(uint64, tag = "1")]
    pub parent: u64,

    #[prost(uint64, repeated, tag = "2")]
    pub children: Vec<u64>,

    /// Indexes into the inode reference section
    #[prost(uint32, repeated, tag = "3")]
    pub ref_children: Vec<u32>,
}
