//! イメージ参照

/// `registry/repository[:tag][@digest]` の分解結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef<'a> {
    /// タグとダイジェストを除いたリポジトリパス
    pub repository: &'a str,
    pub tag: Option<&'a str>,
    pub digest: Option<&'a str>,
}

impl ImageRef<'_> {
    /// タグを差し替えた参照（ダイジェストは落とす）
    pub fn with_tag(&self, tag: &str) -> String {
        format!("{}:{}", self.repository, tag)
    }
}

/// イメージ参照を分解する
///
/// タグは最後の `/` より後にある `:` 以降。レジストリのポート番号
/// (`localhost:5000/app`) はタグとして扱わない。
pub fn split_image_reference(image: &str) -> ImageRef<'_> {
    let (name, digest) = match image.split_once('@') {
        Some((name, digest)) => (name, Some(digest)),
        None => (image, None),
    };

    let last_slash = name.rfind('/').map(|pos| pos + 1).unwrap_or(0);
    match name[last_slash..].rfind(':') {
        Some(pos) => {
            let pos = last_slash + pos;
            ImageRef {
                repository: &name[..pos],
                tag: Some(&name[pos + 1..]),
                digest,
            }
        }
        None => ImageRef {
            repository: name,
            tag: None,
            digest,
        },
    }
}
