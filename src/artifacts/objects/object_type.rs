use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<type> <size>\0` header from a reader and return the
    /// parsed type together with the declared content size.
    ///
    /// Fails if the header is missing its space or NUL delimiter, names an
    /// unknown type, or declares a non-decimal size.
    pub fn parse_header(data_reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut type_bytes = Vec::new();
        data_reader.read_until(b' ', &mut type_bytes)?;
        if type_bytes.pop() != Some(b' ') {
            anyhow::bail!("object header is missing the type delimiter");
        }

        let object_type = ObjectType::try_from(std::str::from_utf8(&type_bytes)?)?;

        let mut size_bytes = Vec::new();
        data_reader.read_until(b'\0', &mut size_bytes)?;
        if size_bytes.pop() != Some(b'\0') {
            anyhow::bail!("object header is missing the NUL delimiter");
        }

        let size = std::str::from_utf8(&size_bytes)?
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("object header declares a malformed size"))?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("invalid object type: {}", value)),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
