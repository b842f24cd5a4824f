#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scribe_core::{BufferConfig, HistoryConfig, Quirks, TERMINATOR, TextBuffer};

#[derive(Debug, Arbitrary)]
enum Op {
    Append(Vec<u8>),
    Insert { pos: u16, text: Vec<u8>, replace: u8 },
    Delete { pos: u16, len: u8 },
    Cut { pos: u16, len: u8 },
    Copy { pos: u16, len: u8 },
    Paste { pos: u16 },
    Find(Vec<u8>),
    Undo,
    Redo,
}

#[derive(Debug, Arbitrary)]
struct Input {
    legacy: bool,
    max_depth: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let quirks = if input.legacy {
        Quirks::legacy()
    } else {
        Quirks::default()
    };
    let config = BufferConfig::default()
        .with_history(HistoryConfig::new(usize::from(input.max_depth).max(1)))
        .with_quirks(quirks);
    let mut buf = TextBuffer::with_config(config);

    for op in input.ops.iter().take(256) {
        let span = buf.len() + 1;
        let before = (buf.get_text().to_vec(), buf.capacity());
        let undo_before = buf.history().undo_depth();

        let result = match op {
            Op::Append(text) => {
                buf.append(text);
                Ok(())
            }
            Op::Insert { pos, text, replace } => {
                buf.insert_and_replace(usize::from(*pos) % span, text, usize::from(*replace))
            }
            Op::Delete { pos, len } => buf.delete_text(usize::from(*pos) % span, usize::from(*len)),
            Op::Cut { pos, len } => buf.cut_text(usize::from(*pos) % span, usize::from(*len)),
            Op::Copy { pos, len } => buf.copy_text(usize::from(*pos) % span, usize::from(*len)),
            Op::Paste { pos } => buf.paste_text(usize::from(*pos) % span),
            Op::Find(needle) => {
                if let Some(at) = buf.find_text(needle) {
                    assert!(at + needle.len() <= buf.len());
                    assert_eq!(&buf.get_text()[at..at + needle.len()], needle.as_slice());
                }
                Ok(())
            }
            Op::Undo => buf.undo(),
            Op::Redo => buf.redo(),
        };

        // Post-conditions that must always hold:
        assert!(buf.capacity() > buf.len(), "capacity <= len");
        assert_eq!(buf.terminated()[buf.len()], TERMINATOR, "missing terminator");

        let forward_edit = !matches!(op, Op::Undo | Op::Redo | Op::Copy { .. } | Op::Find(_));
        if result.is_err() && forward_edit {
            assert_eq!((buf.get_text().to_vec(), buf.capacity()), before);
            assert_eq!(buf.history().undo_depth(), undo_before);
        }
    }
});
