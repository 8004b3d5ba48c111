use encoding_rs::GB18030;
use log::debug;

/// 把接口返回的原始字节转换为文本
pub trait TextDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> String;
}

/// 新浪行情接口使用 GB18030 编码（兼容 GBK/GB2312）
#[derive(Debug, Clone, Copy, Default)]
pub struct Gb18030Decoder;

impl TextDecoder for Gb18030Decoder {
    fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, had_errors) = GB18030.decode(bytes);
        if had_errors {
            debug!("GB18030 解码时遇到非法字节，已使用替换字符");
        }
        text.into_owned()
    }
}

// 测试时可以直接传入闭包，避免依赖真实编码
impl<F> TextDecoder for F
where
    F: Fn(&[u8]) -> String + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> String {
        self(bytes)
    }
}
