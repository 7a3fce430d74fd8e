/// Image payload handed from the host to the processing module.
///
/// The adapter never decodes or inspects the bytes. Dimensions and encoding
/// travel alongside so the module can interpret the data however its own
/// contract requires.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    dimensions: Option<(u32, u32)>,
    encoding: Option<String>,
}

impl Image {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            dimensions: None,
            encoding: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Tags the payload with an encoding name such as `"png"` or `"rgb8"`.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Image {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let image = Image::new(vec![1, 2, 3, 4, 5, 6])
            .with_dimensions(2, 1)
            .with_encoding("rgb8");

        assert_eq!(image.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(image.dimensions(), Some((2, 1)));
        assert_eq!(image.encoding(), Some("rgb8"));
        assert_eq!(image.len(), 6);
    }

    #[test]
    fn test_bare_payload_has_no_metadata() {
        let image = Image::from(vec![0u8; 16]);
        assert_eq!(image.dimensions(), None);
        assert_eq!(image.encoding(), None);
        assert!(!image.is_empty());
    }

    #[test]
    fn test_data_mut_writes_through() {
        let mut image = Image::new(vec![0u8; 4]);
        image.data_mut()[2] = 9;
        assert_eq!(image.into_data(), vec![0, 0, 9, 0]);
    }
}
