use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::file::{Channel, ChannelError, FileHandle, Line, OpenConfig, Whence};

fn scratch() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text01.txt");
    (dir, path)
}

fn read_exactly(channel: &mut Channel, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        let n = channel.read(&mut out[filled..]).unwrap();
        assert_ne!(n, 0, "unexpected end of stream after {} bytes", filled);
        filled += n;
    }
    out
}

fn small_channel(path: &Path, capacity: usize) -> Channel {
    Channel::with_capacity(capacity, FileHandle::create(path).unwrap())
}

#[test]
fn hello_world_round_trip() {
    let (_dir, path) = scratch();

    let mut channel = Channel::open(&path, &OpenConfig::create_truncate()).unwrap();
    assert_eq!(channel.write_str("Hello, world!").unwrap(), 13);
    channel.flush().unwrap();
    channel.close().unwrap();

    let mut channel = Channel::open(&path, &OpenConfig::read_only()).unwrap();
    let data = read_exactly(&mut channel, 13);
    assert_eq!(String::from_utf8(data).unwrap(), "Hello, world!");
    assert_eq!(channel.read(&mut [0u8; 4]).unwrap(), 0);
}

#[test]
fn round_trip_around_buffer_capacity() {
    const CAP: usize = 16;

    for len in [0, 1, CAP - 1, CAP, CAP + 1] {
        let (_dir, path) = scratch();
        let payload: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();

        let mut channel = small_channel(&path, CAP);
        channel.write(&payload).unwrap();
        channel.flush().unwrap();
        channel.rewind().unwrap();

        assert_eq!(read_exactly(&mut channel, len), payload, "len = {}", len);
        assert_eq!(channel.read(&mut [0u8; 8]).unwrap(), 0, "len = {}", len);
    }
}

#[test]
fn many_small_writes_are_buffered() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);

    channel.write(b"abc").unwrap();
    channel.write(b"def").unwrap();
    assert_eq!(channel.pending_write_len(), 6);
    assert_eq!(std::fs::read(&path).unwrap(), b"");

    // Overflows the buffer, so the first six bytes are flushed.
    channel.write(b"ghi").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abcdef");
    assert_eq!(channel.pending_write_len(), 3);

    channel.flush().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abcdefghi");
}

#[test]
fn large_write_bypasses_buffer() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);

    channel.write(b"head").unwrap();
    channel.write(&[b'x'; 20]).unwrap();
    assert_eq!(channel.pending_write_len(), 0);

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(&on_disk[..4], b"head");
    assert_eq!(on_disk.len(), 24);
}

#[test]
fn negative_seek_is_invalid_offset() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);
    channel.write_str("0123456789").unwrap();

    let err = channel.seek(-1, Whence::Start).unwrap_err();
    assert!(matches!(
        err,
        ChannelError::InvalidOffset {
            offset: -1,
            whence: Whence::Start,
            target: -1
        }
    ));

    let err = channel.seek(-11, Whence::End).unwrap_err();
    assert!(matches!(err, ChannelError::InvalidOffset { target: -1, .. }));

    // The failed seeks still flushed the pending bytes and left the cursor alone.
    assert_eq!(channel.position().unwrap(), 10);
    assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
}

#[test]
fn seek_past_end_reads_nothing() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);
    channel.write_str("short").unwrap();

    assert_eq!(channel.seek(100, Whence::Start).unwrap(), 100);
    assert_eq!(channel.read(&mut [0u8; 4]).unwrap(), 0);
}

#[test]
fn seek_relative_to_end_and_current() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 4);
    channel.write_str("Hello, world!").unwrap();

    channel.seek(-6, Whence::End).unwrap();
    assert_eq!(read_exactly(&mut channel, 6), b"world!");

    channel.rewind().unwrap();
    assert_eq!(read_exactly(&mut channel, 2), b"He");
    // Read-ahead holds more than two bytes; the logical cursor is still 2.
    assert_eq!(channel.position().unwrap(), 2);
    assert_eq!(channel.seek(5, Whence::Current).unwrap(), 7);
    assert_eq!(read_exactly(&mut channel, 5), b"world");
}

#[test]
fn write_after_read_lands_at_logical_position() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 64);
    channel.write_str("abcdef").unwrap();
    channel.rewind().unwrap();

    assert_eq!(read_exactly(&mut channel, 2), b"ab");
    assert!(channel.buffered_read_len() > 0);

    channel.write_str("XY").unwrap();
    channel.flush().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"abXYef");

    assert_eq!(read_exactly(&mut channel, 2), b"ef");
}

#[test]
fn independent_channels_see_writes_after_flush() {
    let (_dir, path) = scratch();
    let mut writer = small_channel(&path, 64);
    let mut reader = Channel::open(&path, &OpenConfig::read_only()).unwrap();

    writer.write_str("pending").unwrap();
    assert_eq!(reader.read(&mut [0u8; 16]).unwrap(), 0);

    writer.flush().unwrap();
    reader.rewind().unwrap();
    assert_eq!(read_exactly(&mut reader, 7), b"pending");
}

#[test]
fn read_lines_with_and_without_terminator() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "first\nsecond line\r\n\nlast").unwrap();

    let mut channel = Channel::with_capacity(4, FileHandle::open_read(&path).unwrap());
    let mut lines = Vec::new();
    while let Some(line) = channel.read_line().unwrap() {
        lines.push(line);
    }

    let expected = [
        ("first", true),
        ("second line", true),
        ("", true),
        ("last", false),
    ];
    assert_eq!(lines.len(), expected.len());
    for (line, (content, terminated)) in lines.iter().zip(expected.iter()) {
        assert_eq!(line.to_string_lossy(), *content);
        assert_eq!(line.terminated, *terminated);
    }
}

#[test]
fn read_line_after_write_sees_flushed_data() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 32);

    channel.write_str("Hello, world!").unwrap();
    channel.rewind().unwrap();

    assert_eq!(
        channel.read_line().unwrap(),
        Some(Line {
            content: b"Hello, world!".to_vec(),
            terminated: false,
        })
    );
    assert_eq!(channel.read_line().unwrap(), None);
}

#[test]
fn formatted_writes_go_through_buffer() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 64);

    write!(channel, "{},{:.6},{}", 1, 1.1, "Hello").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"");

    channel.close().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,1.100000,Hello");
}

#[test]
fn read_from_copies_reader() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 5);

    let mut source = std::io::Cursor::new("Hello, world!");
    assert_eq!(channel.read_from(&mut source).unwrap(), 13);
    channel.flush().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello, world!");
}

#[test]
fn std_io_traits_interoperate() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);

    channel.write_all(b"line one\nline two\n").unwrap();
    std::io::Seek::seek(&mut channel, std::io::SeekFrom::Start(0)).unwrap();

    let mut text = String::new();
    channel.read_to_string(&mut text).unwrap();
    assert_eq!(text, "line one\nline two\n");

    std::io::Seek::seek(&mut channel, std::io::SeekFrom::Start(0)).unwrap();
    let lines: Vec<String> = std::io::BufRead::lines(&mut channel)
        .map(|l| l.unwrap())
        .collect();
    assert_eq!(lines, ["line one", "line two"]);
}

#[test]
fn drop_flushes_pending_bytes() {
    let (_dir, path) = scratch();
    {
        let mut channel = small_channel(&path, 64);
        channel.write_str("kept").unwrap();
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
}

#[test]
fn closed_channel_rejects_everything() {
    let (_dir, path) = scratch();
    let mut channel = small_channel(&path, 8);
    channel.write_str("bye").unwrap();
    channel.close().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "bye");
    assert!(matches!(channel.close(), Err(ChannelError::Closed(_))));
    assert!(matches!(channel.write(b"x"), Err(ChannelError::Closed(_))));
    assert!(matches!(
        channel.read(&mut [0u8; 1]),
        Err(ChannelError::Closed(_))
    ));
    assert!(matches!(
        channel.seek(0, Whence::Start),
        Err(ChannelError::Closed(_))
    ));
    assert!(matches!(channel.read_line(), Err(ChannelError::Closed(_))));
    assert!(matches!(channel.flush(), Err(ChannelError::Closed(_))));
}

#[test]
fn handle_write_reports_count_and_size() {
    let (_dir, path) = scratch();
    let mut handle = FileHandle::create(&path).unwrap();

    assert_eq!(handle.write("안녕하세요".as_bytes()).unwrap(), 15);
    assert_eq!(handle.size().unwrap(), 15);
    assert_eq!(handle.position().unwrap(), 15);

    handle.seek(0, Whence::Start).unwrap();
    let mut data = vec![0u8; handle.size().unwrap() as usize];
    assert_eq!(handle.read(&mut data).unwrap(), 15);
    assert_eq!(String::from_utf8(data).unwrap(), "안녕하세요");

    handle.close().unwrap();
    assert!(matches!(handle.close(), Err(ChannelError::Closed(_))));
    assert!(matches!(handle.size(), Err(ChannelError::Closed(_))));
}

#[test]
fn open_errors_are_classified() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    assert!(matches!(
        FileHandle::open_read(&missing),
        Err(ChannelError::NotFound(p)) if p == missing
    ));

    std::fs::write(&missing, "now here").unwrap();
    let must_create = OpenConfig::create_truncate().create_new(true);
    assert!(matches!(
        FileHandle::open(&missing, &must_create),
        Err(ChannelError::AlreadyExists(_))
    ));

    assert!(matches!(
        FileHandle::open_read(dir.path()),
        Err(ChannelError::IsDirectory(_))
    ));
}

#[test]
fn truncate_on_open_empties_file() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "old contents").unwrap();

    let handle = FileHandle::create(&path).unwrap();
    assert_eq!(handle.size().unwrap(), 0);
}

#[test]
fn append_writes_at_end() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "one ").unwrap();

    let config = OpenConfig::new(crate::file::AccessMode::Write).append(true);
    let mut channel = Channel::open(&path, &config).unwrap();
    channel.write_str("two").unwrap();
    channel.close().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "one two");
}

#[cfg(unix)]
#[test]
fn permission_bits_apply_only_on_creation() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = scratch();
    let config = OpenConfig::create_truncate().mode(0o600);
    FileHandle::open(&path, &config).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let config = OpenConfig::create_truncate().mode(0o644);
    FileHandle::open(&path, &config).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn channel_errors_convert_to_io_errors() {
    let err: std::io::Error = ChannelError::NotFound(PathBuf::from("x")).into();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

    let err: std::io::Error = ChannelError::InvalidOffset {
        offset: -3,
        whence: Whence::Current,
        target: -1,
    }
    .into();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains("-3 from current"));
}

#[test]
fn whence_parses_from_str() {
    assert_eq!("start".parse::<Whence>().unwrap(), Whence::Start);
    assert_eq!("cur".parse::<Whence>().unwrap(), Whence::Current);
    assert_eq!("end".parse::<Whence>().unwrap(), Whence::End);
    assert!("middle".parse::<Whence>().is_err());
}

#[test]
fn failed_flush_keeps_bytes_pending() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "original").unwrap();

    let mut channel = Channel::open(&path, &OpenConfig::read_only()).unwrap();
    assert_eq!(channel.write(b"ab").unwrap(), 2);

    assert!(channel.flush().is_err());
    assert_eq!(channel.pending_write_len(), 2);
    assert!(channel.flush().is_err());
    assert_eq!(channel.pending_write_len(), 2);
}

#[test]
fn close_releases_handle_when_flush_fails() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "original").unwrap();

    let mut channel = Channel::open(&path, &OpenConfig::read_only()).unwrap();
    channel.write(b"ab").unwrap();

    assert!(matches!(channel.close(), Err(ChannelError::Io(_, _))));
    assert!(!channel.handle().is_open());
    assert_eq!(channel.pending_write_len(), 0);
    assert!(matches!(channel.close(), Err(ChannelError::Closed(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn drop_with_failing_flush_does_not_panic() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "original").unwrap();

    {
        let mut channel = Channel::open(&path, &OpenConfig::read_only()).unwrap();
        channel.write(b"lost").unwrap();
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
}

#[test]
fn append_position_counts_existing_bytes() {
    let (_dir, path) = scratch();
    std::fs::write(&path, "0123456789").unwrap();

    let config = OpenConfig::new(crate::file::AccessMode::Write).append(true);
    let mut channel = Channel::open(&path, &config).unwrap();
    assert!(channel.handle().is_append());

    channel.write(b"ab").unwrap();
    assert_eq!(channel.position().unwrap(), 12);
    assert_eq!(channel.pending_write_len(), 0);

    channel.write(b"cd").unwrap();
    channel.close().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0123456789abcd");
}
