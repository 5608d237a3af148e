// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};

use crate::error::WriterError;

const DBIN_MAGIC_BYTES: &[u8; 4] = b"dbin";

/// The bytes of a dbin file minus the header
pub type DbinMessages = Vec<Vec<u8>>;

/// `DbinFile` is a struct representing a simple file storage format to pack a
/// stream of protobuf messages, defined by StreamingFast.
///
/// For more information, see [the dbin format documentation](https://github.com/streamingfast/dbin).
#[derive(Debug)]
pub struct DbinFile {
    pub header: DbinHeader,
    pub messages: DbinMessages,
}

/// `DbinHeader` contains the fields that compose the header of the .dbin file.
#[derive(Debug, PartialEq, Eq)]
pub struct DbinHeader {
    /// Next single byte after the 4 magic bytes, file format version
    pub version: u8,
    /// Content type, a 3-byte tag like 'ETH' in version 0 files, a
    /// length-prefixed string in version 1 files
    pub content_type: String,
    /// Version 0 only: 2 bytes, 10-based string representation of content
    /// version, ranges in '00'-'99'. Empty for version 1 files.
    pub content_version: String,
}

impl DbinFile {
    /// Returns a `DbinFile` from a Reader, consuming it to the end.
    pub fn try_from_read<R: Read>(read: &mut R) -> Result<Self, WriterError> {
        let header = Self::read_header(read)?;
        let mut messages: DbinMessages = vec![];

        loop {
            match Self::read_message(read) {
                Ok(message) => messages.push(message),
                Err(WriterError::Io(io_error))
                    if io_error.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(DbinFile { header, messages });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads a DbinHeader, which is used as the starting point for
    /// interpreting .dbin file contents.
    fn read_header<R: Read>(read: &mut R) -> Result<DbinHeader, WriterError> {
        let mut magic: [u8; 4] = [0; 4];
        read.read_exact(&mut magic)?;

        if &magic != DBIN_MAGIC_BYTES {
            return Err(WriterError::MagicBytesInvalid);
        }

        let mut version: [u8; 1] = [0; 1];
        read.read_exact(&mut version)?;

        match version[0] {
            0 => {
                let mut content_type_bytes: [u8; 3] = [0; 3];
                read.read_exact(&mut content_type_bytes)?;
                let content_type = String::from_utf8(content_type_bytes.to_vec())?;

                let mut content_version_bytes: [u8; 2] = [0; 2];
                read.read_exact(&mut content_version_bytes)?;
                let content_version = String::from_utf8(content_version_bytes.to_vec())?;

                Ok(DbinHeader {
                    version: 0,
                    content_type,
                    content_version,
                })
            }
            1 => {
                let mut len: [u8; 2] = [0; 2];
                read.read_exact(&mut len)?;

                let mut content_type_bytes = vec![0; u16::from_be_bytes(len) as usize];
                read.read_exact(&mut content_type_bytes)?;
                let content_type = String::from_utf8(content_type_bytes)?;

                Ok(DbinHeader {
                    version: 1,
                    content_type,
                    content_version: String::new(),
                })
            }
            _ => Err(WriterError::VersionUnsupported),
        }
    }

    /// Reads a single length-prefixed message.
    fn read_message<R: Read>(read: &mut R) -> Result<Vec<u8>, WriterError> {
        let mut size: [u8; 4] = [0; 4];
        read.read_exact(&mut size)?;

        if &size == DBIN_MAGIC_BYTES {
            return Err(WriterError::MagicBytesInvalid);
        }

        let mut content: Vec<u8> = vec![0; u32::from_be_bytes(size) as usize];
        read.read_exact(&mut content)?;
        Ok(content)
    }
}

/// Encodes a version 1 dbin header frame.
pub(crate) fn header_frame(content_type: &str) -> Result<Vec<u8>, WriterError> {
    let len = u16::try_from(content_type.len()).map_err(|_| WriterError::ContentTypeInvalid {
        size: content_type.len(),
    })?;

    let mut frame = Vec::with_capacity(4 + 1 + 2 + content_type.len());
    frame.extend_from_slice(DBIN_MAGIC_BYTES);
    frame.push(1);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(content_type.as_bytes());
    Ok(frame)
}

/// Encodes one length-prefixed message frame.
pub(crate) fn message_frame(message: &[u8]) -> Result<Vec<u8>, WriterError> {
    let size = u32::try_from(message.len()).map_err(|_| WriterError::FrameTooLarge {
        size: message.len(),
    })?;

    let mut frame = Vec::with_capacity(4 + message.len());
    frame.extend_from_slice(&size.to_be_bytes());
    frame.extend_from_slice(message);
    Ok(frame)
}

/// Writes a stream of protobuf messages into one version 1 .dbin file.
pub struct DbinWriter<W> {
    write: W,
}

impl<W: Write> DbinWriter<W> {
    /// Writes the file header and returns the writer, ready for messages.
    pub fn new(mut write: W, content_type: &str) -> Result<Self, WriterError> {
        write.write_all(&header_frame(content_type)?)?;
        Ok(Self { write })
    }

    /// Appends one length-prefixed message.
    pub fn write_message(&mut self, message: &[u8]) -> Result<(), WriterError> {
        self.write.write_all(&message_frame(message)?)?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, WriterError> {
        self.write.flush()?;
        Ok(self.write)
    }
}
