use std::io::{BufRead, BufReader, Chain, Cursor, Read};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{Error, Result};
use crate::session::Session;

/// Base URL for per-chunk downloads
const SNAPSHOTS_URL: &str = "https://api.enterprise.wikimedia.com/v2/snapshots";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A chunk body with compression sniffed from its leading magic bytes.
/// Reads strictly forward; the consumed prefix is replayed ahead of the
/// remaining stream so no seeking is ever required of the underlying reader.
/// Only gzip is recognized (chunk downloads are gzip-compressed tars);
/// anything else is consumed as a raw tar stream.
enum ChunkReader<R: Read> {
    Gzip(GzDecoder<Chain<Cursor<Vec<u8>>, R>>),
    Plain(Chain<Cursor<Vec<u8>>, R>),
}

impl<R: Read> ChunkReader<R> {
    fn new(mut inner: R) -> std::io::Result<Self> {
        let mut magic = [0u8; 2];
        let mut filled = 0;
        while filled < magic.len() {
            let n = inner.read(&mut magic[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        let replayed = Cursor::new(magic[..filled].to_vec()).chain(inner);
        Ok(if filled == magic.len() && magic == GZIP_MAGIC {
            ChunkReader::Gzip(GzDecoder::new(replayed))
        } else {
            ChunkReader::Plain(replayed)
        })
    }
}

impl<R: Read> Read for ChunkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            ChunkReader::Gzip(reader) => reader.read(buf),
            ChunkReader::Plain(reader) => reader.read(buf),
        }
    }
}

/// Stream one chunk download and hand every regular file it contains to
/// `on_file` as a forward-only buffered reader. Each reader is lazy, finite
/// and single-pass: consuming it advances the live network stream, so it
/// cannot be restarted or revisited after the callback returns.
///
/// A non-success response dumps the body to stdout and fails the run.
pub fn process_chunk<F>(
    session: &Session,
    snapshot_id: &str,
    chunk_id: &str,
    on_file: F,
) -> Result<()>
where
    F: FnMut(&str, &mut dyn BufRead) -> Result<()>,
{
    let url = format!("{}/{}/chunks/{}/download", SNAPSHOTS_URL, snapshot_id, chunk_id);
    process_chunk_at(session, &url, on_file)
}

pub(crate) fn process_chunk_at<F>(session: &Session, url: &str, mut on_file: F) -> Result<()>
where
    F: FnMut(&str, &mut dyn BufRead) -> Result<()>,
{
    let response = session.client().get(url).send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        println!("{}", body);
        return Err(Error::Download { status, body });
    }

    read_tar_stream(response, &mut on_file)
}

/// Walk a (possibly gzip-compressed) tar stream, invoking the callback for
/// each regular file. Directories, symlinks and other non-regular entries
/// are skipped silently. Split out from the download so tests can feed
/// in-memory archives.
pub fn read_tar_stream<R, F>(reader: R, on_file: &mut F) -> Result<()>
where
    R: Read,
    F: FnMut(&str, &mut dyn BufRead) -> Result<()>,
{
    let mut archive = Archive::new(ChunkReader::new(reader)?);
    for entry in archive.entries()? {
        let entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry.path()?.to_string_lossy().into_owned();
        let mut lines = BufReader::new(entry);
        on_file(&name, &mut lines)?;
    }
    Ok(())
}
