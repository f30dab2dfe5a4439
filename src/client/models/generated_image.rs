use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Bytes,
    pub width: usize,
    pub height: usize,
}
