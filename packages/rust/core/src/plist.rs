//! `Info.plist` rendering.
//!
//! Every caller-supplied string is XML-escaped before it is interpolated.

use std::borrow::Cow;

/// Family tag that marks the bundle as a Dash-compatible docset.
pub const DOCSET_FAMILY: &str = "dashtoc";

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
"#;

const FOOTER: &str = "</dict>\n</plist>\n";

/// Values written to `Info.plist`.
#[derive(Debug, Clone, Copy)]
pub struct InfoPlist<'a> {
    pub identifier: &'a str,
    pub name: &'a str,
    pub platform_family: &'a str,
    pub index: &'a str,
    pub enable_javascript: bool,
}

impl InfoPlist<'_> {
    /// Render the property list document.
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        push_string(&mut out, "CFBundleIdentifier", self.identifier);
        push_string(&mut out, "CFBundleName", self.name);
        push_string(&mut out, "DocSetPlatformFamily", self.platform_family);
        push_string(&mut out, "dashIndexFilePath", self.index);
        push_string(&mut out, "DashDocSetFamily", DOCSET_FAMILY);
        push_bool(&mut out, "isDashDocset", true);
        push_bool(&mut out, "isJavaScriptEnabled", self.enable_javascript);
        out.push_str(FOOTER);
        out
    }
}

fn push_string(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!(
        "\t<key>{key}</key>\n\t<string>{}</string>\n",
        escape_xml(value)
    ));
}

fn push_bool(out: &mut String, key: &str, value: bool) {
    out.push_str(&format!("\t<key>{key}</key>\n\t<{value}/>\n"));
}

/// Escape the XML-reserved characters of `text`.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Reverse of [`escape_xml`].
pub fn unescape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    // `&amp;` last so an escaped entity is not decoded twice.
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// Read the `<string>` value following `<key>{key}</key>` in a rendered plist.
pub fn string_value(plist: &str, key: &str) -> Option<String> {
    let marker = format!("<key>{key}</key>");
    let after_key = &plist[plist.find(&marker)? + marker.len()..];
    let start = after_key.find("<string>")? + "<string>".len();
    let value = &after_key[start..];
    let end = value.find("</string>")?;

    // The value must belong to this key, not a later one.
    if after_key[..start].contains("<key>") {
        return None;
    }
    Some(unescape_xml(&value[..end]).into_owned())
}
