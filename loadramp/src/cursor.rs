//! Shared cursor over the stream of target descriptors.
//!
//! Every attack reads a prefix of the same stream, and the tool may be stopped halfway through a
//! line. The cursor owns the stream between attacks and moves it back onto a line boundary before
//! the next attack starts.
use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek};
use std::process::Stdio;
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

pub struct TargetStreamCursor<R> {
    inner: R,
    /// No one has read from `inner` since it was last on a line boundary.
    aligned: bool,
}

impl<R: Read + Seek> TargetStreamCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            aligned: true,
        }
    }

    /// Discard bytes up to and including the next `\n`, returning how many were consumed.
    ///
    /// Does nothing when the stream hasn't been handed out since it was last aligned, or when the
    /// previous byte was a line terminator. Once a pipe has been handed out its boundary can't be
    /// observed, so the remainder of the current line is always discarded. End-of-stream is not an
    /// error.
    pub fn realign(&mut self) -> io::Result<usize> {
        if self.aligned || self.at_line_boundary()? {
            self.aligned = true;
            return Ok(0);
        }

        let mut consumed = 0;
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    trace!("Target stream exhausted while realigning");
                    break;
                }
                Ok(_) => {
                    consumed += 1;
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.aligned = true;
        Ok(consumed)
    }

    /// `Ok(false)` also covers streams without a position.
    fn at_line_boundary(&mut self) -> io::Result<bool> {
        let position = match self.inner.stream_position() {
            Ok(position) => position,
            Err(_) => return Ok(false),
        };
        if position == 0 {
            return Ok(true);
        }

        let mut previous = [0u8; 1];
        self.inner.seek(io::SeekFrom::Start(position - 1))?;
        self.inner.read_exact(&mut previous)?;
        Ok(previous[0] == b'\n')
    }
}

impl<R> TargetStreamCursor<R> {
    pub fn get_mut(&mut self) -> &mut R {
        self.aligned = false;
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl TargetStreamCursor<File> {
    /// Unbuffered duplicate of this process's standard input.
    ///
    /// The duplicate shares its offset with fd 0, so bytes read by a child through
    /// [`stdio`](Self::stdio) are never seen again by the cursor.
    pub fn stdin() -> io::Result<Self> {
        #[cfg(unix)]
        let owned = {
            use std::os::fd::AsFd;
            io::stdin().as_fd().try_clone_to_owned()?
        };
        #[cfg(windows)]
        let owned = {
            use std::os::windows::io::AsHandle;
            io::stdin().as_handle().try_clone_to_owned()?
        };
        Ok(Self::new(File::from(owned)))
    }

    /// Handle to give to an attack as its standard input.
    pub fn stdio(&mut self) -> io::Result<Stdio> {
        self.aligned = false;
        Ok(Stdio::from(self.inner.try_clone()?))
    }
}
