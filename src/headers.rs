//! ヘッダーの順序付きマルチマップ

/// ヘッダー名ごとの値リスト
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    values: Vec<String>,
}

/// HTTP ヘッダー
///
/// 名前の比較は大文字小文字を区別しない。
/// 同じ名前が繰り返された場合は値を追加する。
/// [`Headers::iter()`] は受信した順序と名前の表記のまま返す。
///
/// ```rust
/// use http11_events::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Accept", "text/html");
/// headers.append("Host", "example.com");
/// headers.append("accept", "text/plain");
///
/// assert_eq!(headers.get("ACCEPT"), Some("text/html"));
/// assert_eq!(headers.get_all("Accept"), ["text/html", "text/plain"]);
/// assert_eq!(headers.names().collect::<Vec<_>>(), ["Accept", "Host"]);
/// assert_eq!(
///     headers.iter().collect::<Vec<_>>(),
///     [("Accept", "text/html"), ("Host", "example.com"), ("accept", "text/plain")]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Entry>,
    /// 到着順の (エントリの位置, 受信した名前)
    order: Vec<(usize, String)>,
}

impl Headers {
    /// 空のヘッダーを作成
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// 値を追加
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let found = self
            .entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(&name));
        let index = match found {
            Some(index) => {
                self.entries[index].values.push(value);
                index
            }
            None => {
                self.entries.push(Entry {
                    name: name.clone(),
                    values: vec![value],
                });
                self.entries.len() - 1
            }
        };
        self.order.push((index, name));
    }

    /// 指定した名前の最後の値に空白 1 つと継続行の内容を連結する
    ///
    /// 最後の値が空でも空白を入れる。名前が存在しない場合は何もしない。
    pub(crate) fn fold_last(&mut self, name: &str, continuation: &str) {
        if continuation.is_empty() {
            return;
        }
        if let Some(last) = self.entry_mut(name).and_then(|e| e.values.last_mut()) {
            last.push(' ');
            last.push_str(continuation);
        }
    }

    /// 最初の値を取得
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name)
            .and_then(|e| e.values.first())
            .map(String::as_str)
    }

    /// すべての値を取得
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entry(name).map_or(&[][..], |e| e.values.as_slice())
    }

    /// ヘッダーが存在するか確認
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// ヘッダーを削除し、削除した値を返す
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
        else {
            return Vec::new();
        };
        self.order.retain(|(i, _)| *i != index);
        for (i, _) in &mut self.order {
            if *i > index {
                *i -= 1;
            }
        }
        self.entries.remove(index).values
    }

    /// 値の総数
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.values.len()).sum()
    }

    /// ヘッダーが空か確認
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// ヘッダー名を最初に現れた順で返す
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// `(名前, 値)` の組を受信した順に返す
    ///
    /// 名前は受信したときの表記のまま返す。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        // エントリごとに何番目の値まで返したか
        let mut taken = vec![0usize; self.entries.len()];
        self.order.iter().filter_map(move |(index, name)| {
            let value = self.entries.get(*index)?.values.get(taken[*index])?;
            taken[*index] += 1;
            Some((name.as_str(), value.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_accumulate() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("X-Other", "x");
        headers.append("set-cookie", "b=2");

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get_all("SET-COOKIE"), ["a=1", "b=2"]);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("Set-Cookie", "a=1"), ("X-Other", "x"), ("set-cookie", "b=2")]
        );
    }

    #[test]
    fn iter_keeps_arrival_order_and_spelling() {
        let mut headers = Headers::new();
        headers.append("A", "1");
        headers.append("B", "2");
        headers.append("a", "3");

        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("A", "1"), ("B", "2"), ("a", "3")]
        );
        assert_eq!(headers.names().collect::<Vec<_>>(), ["A", "B"]);
    }

    #[test]
    fn iter_after_remove() {
        let mut headers = Headers::new();
        headers.append("A", "1");
        headers.append("B", "2");
        headers.append("C", "3");
        headers.append("b", "4");
        headers.append("c", "5");
        headers.fold_last("C", "folded");
        headers.remove("B");

        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("A", "1"), ("C", "3"), ("c", "5 folded")]
        );
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn fold_appends_to_last_value() {
        let mut headers = Headers::new();
        headers.append("X-A", "foo");
        headers.append("X-A", "bar");
        headers.fold_last("x-a", "baz");
        assert_eq!(headers.get_all("X-A"), ["foo", "bar baz"]);

        headers.fold_last("missing", "ignored");
        assert!(!headers.contains("missing"));
    }

    #[test]
    fn fold_into_empty_value() {
        let mut headers = Headers::new();
        headers.append("X-Empty", "");
        headers.fold_last("X-Empty", "value");
        assert_eq!(headers.get("X-Empty"), Some(" value"));
    }

    #[test]
    fn remove_returns_values() {
        let mut headers = Headers::new();
        headers.append("A", "1");
        headers.append("B", "2");
        assert_eq!(headers.remove("a"), ["1"]);
        assert!(headers.remove("a").is_empty());
        assert_eq!(headers.names().collect::<Vec<_>>(), ["B"]);
        assert!(!headers.is_empty());
    }
}
