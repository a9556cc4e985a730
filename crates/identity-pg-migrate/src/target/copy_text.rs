//! COPY text-format encoding for destination rows.

use crate::entity::Field;
use bytes::{BufMut, BytesMut};

/// Append one row in COPY text format: tab-separated fields, newline
/// terminated.
pub(crate) fn encode_row(buf: &mut BytesMut, fields: &[Field<'_>]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            buf.put_u8(b'\t');
        }
        encode_field(buf, field);
    }
    buf.put_u8(b'\n');
}

fn encode_field(buf: &mut BytesMut, field: &Field<'_>) {
    match field {
        Field::Text(s) => put_escaped(buf, s),
        Field::NullableText(Some(s)) => put_escaped(buf, s),
        Field::Bool(b) => buf.put_slice(if *b { b"t" } else { b"f" }),
        Field::I32(n) => buf.put_slice(n.to_string().as_bytes()),
        Field::NullableBytes(Some(b)) => {
            // bytea hex literal; the leading backslash is itself escaped.
            buf.put_slice(b"\\\\x");
            buf.put_slice(hex::encode(b).as_bytes());
        }
        Field::NullableTimestamp(Some(ts)) => buf.put_slice(ts.to_rfc3339().as_bytes()),
        Field::NullableText(None) | Field::NullableBytes(None) | Field::NullableTimestamp(None) => {
            buf.put_slice(b"\\N")
        }
    }
}

/// Escape special characters for COPY text format: backslash, tab, newline,
/// carriage return.
fn put_escaped(buf: &mut BytesMut, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => buf.put_slice(b"\\\\"),
            '\t' => buf.put_slice(b"\\t"),
            '\n' => buf.put_slice(b"\\n"),
            '\r' => buf.put_slice(b"\\r"),
            _ => {
                let mut utf8 = [0u8; 4];
                buf.put_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[Field<'_>]) -> String {
        let mut buf = BytesMut::new();
        encode_row(&mut buf, fields);
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn test_plain_text_row() {
        let row = encode(&[Field::Text("u1"), Field::Text("r1")]);
        assert_eq!(row, "u1\tr1\n");
    }

    #[test]
    fn test_null_and_bool_and_int() {
        let row = encode(&[
            Field::NullableText(None),
            Field::Bool(true),
            Field::Bool(false),
            Field::I32(-42),
        ]);
        assert_eq!(row, "\\N\tt\tf\t-42\n");
    }

    #[test]
    fn test_special_characters_escaped() {
        let row = encode(&[Field::Text("a\tb\nc\\d\re")]);
        assert_eq!(row, "a\\tb\\nc\\\\d\\re\n");
    }

    #[test]
    fn test_bytes_hex_encoded() {
        let row = encode(&[Field::NullableBytes(Some(&[0xde, 0xad]))]);
        assert_eq!(row, "\\\\xdead\n");
    }

    #[test]
    fn test_null_timestamp() {
        let row = encode(&[Field::NullableTimestamp(None)]);
        assert_eq!(row, "\\N\n");
    }
}
