use std::io::{self, Read, Seek, SeekFrom};

pub struct LittleEndianReader<R> {
    inner: R,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn len(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Bytes left between the cursor and the end of the stream.
    pub fn remaining(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        Ok(self.len()?.saturating_sub(cur))
    }
}
