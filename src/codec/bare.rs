//! BARE 风格的基础类型编解码

use super::CodecError;
use bytes::{Buf, BufMut};
use std::collections::BTreeMap;

/// uvarint 最多 10 个字节（64 位）
const MAX_VARINT_LEN: usize = 10;

pub fn write_uint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub fn read_uint<B: Buf>(buf: &mut B) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(CodecError::UnexpectedEof);
        }
        let byte = buf.get_u8();
        let low = u64::from(byte & 0x7f);
        // 第 10 个字节只能携带最高 1 位
        if i == MAX_VARINT_LEN - 1 && low > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= low << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::VarintOverflow)
}

pub fn write_u8<B: BufMut>(buf: &mut B, value: u8) {
    buf.put_u8(value);
}

pub fn read_u8<B: Buf>(buf: &mut B) -> Result<u8, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::UnexpectedEof);
    }
    Ok(buf.get_u8())
}

/// 读取长度前缀，并确认剩余字节足够
fn read_len<B: Buf>(buf: &mut B) -> Result<usize, CodecError> {
    let len = read_uint(buf)?;
    let len = usize::try_from(len).map_err(|_| CodecError::VarintOverflow)?;
    if buf.remaining() < len {
        return Err(CodecError::UnexpectedEof);
    }
    Ok(len)
}

pub fn write_data<B: BufMut>(buf: &mut B, data: &[u8]) {
    write_uint(buf, data.len() as u64);
    buf.put_slice(data);
}

pub fn read_data<B: Buf>(buf: &mut B) -> Result<Vec<u8>, CodecError> {
    let len = read_len(buf)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    Ok(data)
}

pub fn write_string<B: BufMut>(buf: &mut B, value: &str) {
    write_data(buf, value.as_bytes());
}

pub fn read_string<B: Buf>(buf: &mut B) -> Result<String, CodecError> {
    let data = read_data(buf)?;
    String::from_utf8(data).map_err(|_| CodecError::InvalidUtf8)
}

pub fn write_array<B, T, F>(buf: &mut B, items: &[T], mut write_item: F)
where
    B: BufMut,
    F: FnMut(&mut B, &T),
{
    write_uint(buf, items.len() as u64);
    for item in items {
        write_item(buf, item);
    }
}

pub fn read_array<B, T, F>(buf: &mut B, mut read_item: F) -> Result<Vec<T>, CodecError>
where
    B: Buf,
    F: FnMut(&mut B) -> Result<T, CodecError>,
{
    let count = read_uint(buf)?;
    let count = usize::try_from(count).map_err(|_| CodecError::VarintOverflow)?;
    // 每个元素至少占 1 个字节，数量不可能超过剩余字节数
    if count > buf.remaining() {
        return Err(CodecError::UnexpectedEof);
    }
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read_item(buf)?);
    }
    Ok(items)
}

/// `map<string, data>`，按键排序写出，保证编码稳定
pub fn write_metadata<B: BufMut>(buf: &mut B, metadata: &BTreeMap<String, Vec<u8>>) {
    write_uint(buf, metadata.len() as u64);
    for (key, value) in metadata {
        write_string(buf, key);
        write_data(buf, value);
    }
}

/// 重复的键以最后一次出现为准
pub fn read_metadata<B: Buf>(buf: &mut B) -> Result<BTreeMap<String, Vec<u8>>, CodecError> {
    let count = read_uint(buf)?;
    let count = usize::try_from(count).map_err(|_| CodecError::VarintOverflow)?;
    if count > buf.remaining() {
        return Err(CodecError::UnexpectedEof);
    }
    let mut metadata = BTreeMap::new();
    for _ in 0..count {
        let key = read_string(buf)?;
        let value = read_data(buf)?;
        metadata.insert(key, value);
    }
    Ok(metadata)
}

pub fn write_tag<B: BufMut>(buf: &mut B, tag: u64) {
    write_uint(buf, tag);
}

pub fn read_tag<B: Buf>(buf: &mut B) -> Result<u64, CodecError> {
    read_uint(buf)
}

/// 确认输入已经全部消费
pub fn expect_end<B: Buf>(buf: &B) -> Result<(), CodecError> {
    match buf.remaining() {
        0 => Ok(()),
        n => Err(CodecError::TrailingBytes(n)),
    }
}
