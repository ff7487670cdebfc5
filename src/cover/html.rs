//! Annotated-source HTML rendering of a coverage profile.
//!
//! Blocks that ran are coloured by heat, as `go tool cover -html` does. A
//! block that ran inside a function no test calls directly is marked
//! `blanket-uncovered` instead: covered, but only as a side effect.

use std::fmt::Write as _;
use std::path::Path;

use crate::analysis::Report;

use super::profile::{Boundary, Mode, Profile};

/// CSS class for blocks inside functions without a direct test.
pub const UNCOVERED_CLASS: &str = "blanket-uncovered";

/// One file of the rendered page.
#[derive(Debug, Clone)]
pub struct FileView {
    pub name: String,
    pub coverage: f64,
    /// Annotated, escaped source.
    pub body: String,
}

/// Render one source file with its block spans.
///
/// `path` is the source file that `src` was read from; it is matched against
/// the analyzed declarations by file name.
pub fn annotate(src: &[u8], path: &Path, boundaries: &[Boundary], report: &Report) -> String {
    let uncalled: Vec<_> = report
        .declared_details
        .values()
        .filter(|f| !report.called.contains(&f.name))
        .filter(|f| Path::new(&f.file).file_name() == path.file_name())
        .collect();

    let mut out = Vec::with_capacity(src.len() * 2);
    let mut pending = boundaries.iter().peekable();

    for (i, &byte) in src.iter().enumerate() {
        while let Some(b) = pending.next_if(|b| b.offset == i) {
            if b.start {
                let class = if b.count > 0 && uncalled.iter().any(|f| f.body_contains(b.offset)) {
                    UNCOVERED_CLASS.to_string()
                } else {
                    format!("cov{}", heat_class(b))
                };
                out.extend_from_slice(
                    format!(r#"<span class="{}" title="{}">"#, class, b.count).as_bytes(),
                );
            } else {
                out.extend_from_slice(b"</span>");
            }
        }
        match byte {
            b'>' => out.extend_from_slice(b"&gt;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'&' => out.extend_from_slice(b"&amp;"),
            b'\t' => out.extend_from_slice(b"        "),
            _ => out.push(byte),
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// 0 for blocks that never ran, else 1..=10 by normalised count.
fn heat_class(b: &Boundary) -> u32 {
    if b.count == 0 {
        0
    } else {
        (b.norm * 9.0).floor() as u32 + 1
    }
}

/// Text colour for heat class `n`.
fn rgb(n: u32) -> String {
    if n == 0 {
        return "rgb(192, 0, 0)".to_string();
    }
    let n = n - 1;
    format!("rgb({}, {}, {})", 128 - 12 * n, 128 + 12 * n, 128 + 3 * n)
}

fn colors() -> String {
    let mut css = String::new();
    for n in 0..=10 {
        let _ = writeln!(css, "\t\t\t.cov{} {{ color: {} }}", n, rgb(n));
    }
    let _ = writeln!(css, "\t\t\t.{} {{ color: rgb(252, 242, 106) }}", UNCOVERED_CLASS);
    css
}

const PAGE_HEAD: &str = r#"
<!DOCTYPE html>
<html>
	<head>
		<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
		<style>
			body {
				background: black;
				color: rgb(80, 80, 80);
			}
			body, pre, #legend span {
				font-family: Menlo, monospace;
				font-weight: bold;
			}
			#topbar {
				background: black;
				position: fixed;
				top: 0; left: 0; right: 0;
				height: 42px;
				border-bottom: 1px solid rgb(80, 80, 80);
			}
			#content {
				margin-top: 50px;
			}
			#nav, #legend {
				float: left;
				margin-left: 10px;
			}
			#legend {
				margin-top: 12px;
			}
			#nav {
				margin-top: 10px;
			}
			#legend span {
				margin: 0 1px;
			}
"#;

const PAGE_SCRIPT: &str = r#"	<script>
	(function() {
		let files = document.getElementById('files');
		let visible = document.getElementById('file0');
		files.addEventListener('change', onChange, false);
		function onChange() {
			visible.style.display = 'none';
			visible = document.getElementById(files.value);
			visible.style.display = 'block';
			window.scrollTo(0, 0);
		}
	})();
	</script>
</html>
"#;

/// Assemble the full page for every rendered file.
pub fn page(files: &[FileView], mode: Mode) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str(&colors());
    html.push_str("\n\t\t</style>\n\t</head>\n\t<body>\n\t\t<div id=\"topbar\">\n\t\t\t<div id=\"nav\">\n\t\t\t\t<select id=\"files\">\n");
    for (i, file) in files.iter().enumerate() {
        let _ = write!(
            html,
            "\n\t\t\t\t<option value=\"file{}\">{} ({:.1}%)</option>\n",
            i,
            escape(&file.name),
            file.coverage
        );
    }
    html.push_str("\n\t\t\t\t</select>\n\t\t\t</div>\n\t\t\t<div id=\"legend\">\n\t\t\t\t<span>not tracked</span>\n");

    if mode == Mode::Set {
        html.push_str("\n\t\t\t\t<span class=\"cov0\">not covered</span>\n\t\t\t\t<span class=\"cov8\">covered</span>\n");
    } else {
        html.push_str("\n\t\t\t\t<span class=\"cov0\">no coverage</span>\n\t\t\t\t<span class=\"cov1\">low coverage</span>\n");
        for n in 2..=9 {
            let _ = writeln!(html, "\t\t\t\t<span class=\"cov{}\">*</span>", n);
        }
        html.push_str("\t\t\t\t<span class=\"cov10\">high coverage</span>\n");
    }
    let _ = write!(
        html,
        "\n\t\t\t\t<span class=\"{}\">indirectly covered</span>\n\t\t\t</div>\n\t\t</div>\n\t\t<div id=\"content\">\n",
        UNCOVERED_CLASS
    );

    for (i, file) in files.iter().enumerate() {
        let style = if i > 0 { "style=\"display: none\"" } else { "" };
        let _ = write!(
            html,
            "\n\t\t<pre class=\"file\" id=\"file{}\" {}>{}</pre>\n",
            i, style, file.body
        );
    }
    html.push_str("\n\t\t</div>\n\t</body>\n");
    html.push_str(PAGE_SCRIPT);
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
}

/// Build the view of one profile's file.
pub fn file_view(profile: &Profile, src: &[u8], path: &Path, report: &Report) -> FileView {
    let boundaries = profile.boundaries(src);
    FileView {
        name: profile.file_name.clone(),
        coverage: profile.percent_covered(),
        body: annotate(src, path, &boundaries, report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DeclaredFunction, Position};
    use crate::cover::profile;
    use std::collections::{BTreeMap, BTreeSet};

    const SIMPLE: &str = "package simple\n\nfunc a() string {\n\treturn \"A\"\n}\n\nfunc b() string {\n\treturn \"B\"\n}\n\nfunc c() string {\n\treturn \"C\"\n}\n\nfunc wrapper() {\n\ta()\n\tb()\n\tc()\n}\n";

    fn pos(offset: usize, line: usize, column: usize) -> Position {
        Position {
            file: "pkg/simple.go".to_string(),
            offset,
            line,
            column,
        }
    }

    fn func(name: &str, decl: (usize, usize), open: (usize, usize, usize), close: (usize, usize)) -> DeclaredFunction {
        DeclaredFunction {
            name: name.to_string(),
            file: "pkg/simple.go".to_string(),
            decl: pos(decl.0, decl.1, 1),
            body_open: Some(pos(open.0, open.1, open.2)),
            body_close: Some(pos(close.0, close.1, 1)),
        }
    }

    fn simple_report() -> Report {
        let funcs = vec![
            func("a", (16, 3), (32, 3, 17), (46, 5)),
            func("b", (49, 7), (65, 7, 17), (79, 9)),
            func("c", (82, 11), (98, 11, 17), (112, 13)),
            func("wrapper", (115, 15), (130, 15, 16), (147, 19)),
        ];
        let declared_details: BTreeMap<_, _> = funcs.into_iter().map(|f| (f.name.clone(), f)).collect();
        Report {
            declared: declared_details.keys().cloned().collect(),
            declared_details,
            called: ["a", "c", "wrapper"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn simple_profile(mode: &str, counts: [u64; 4]) -> profile::Profile {
        let text = format!(
            "mode: {}\nexample.com/simple/simple.go:3.17,5.2 1 {}\nexample.com/simple/simple.go:7.17,9.2 1 {}\nexample.com/simple/simple.go:11.17,13.2 1 {}\nexample.com/simple/simple.go:15.16,19.2 3 {}\n",
            mode, counts[0], counts[1], counts[2], counts[3]
        );
        profile::parse(&text).unwrap().remove(0)
    }

    #[test]
    fn test_annotate_count_profile() {
        let profile = simple_profile("count", [2, 1, 2, 1]);
        let view = file_view(&profile, SIMPLE.as_bytes(), Path::new("pkg/simple.go"), &simple_report());
        let expected = r#"package simple

func a() string <span class="cov10" title="2">{
        return "A"
}</span>

func b() string <span class="blanket-uncovered" title="1">{
        return "B"
}</span>

func c() string <span class="cov10" title="2">{
        return "C"
}</span>

func wrapper() <span class="cov1" title="1">{
        a()
        b()
        c()
}</span>
"#;
        assert_eq!(view.body, expected);
        assert_eq!(view.coverage, 100.0);
    }

    #[test]
    fn test_annotate_set_profile() {
        let profile = simple_profile("set", [1, 1, 1, 1]);
        let body = file_view(&profile, SIMPLE.as_bytes(), Path::new("pkg/simple.go"), &simple_report()).body;
        assert!(body.contains(r#"func a() string <span class="cov8" title="1">{"#));
        assert!(body.contains(r#"func b() string <span class="blanket-uncovered" title="1">{"#));
    }

    #[test]
    fn test_unexecuted_block_keeps_cov0() {
        let profile = simple_profile("count", [2, 0, 2, 1]);
        let body = file_view(&profile, SIMPLE.as_bytes(), Path::new("pkg/simple.go"), &simple_report()).body;
        assert!(body.contains(r#"func b() string <span class="cov0" title="0">{"#));
    }

    #[test]
    fn test_other_files_are_not_marked() {
        let profile = simple_profile("count", [2, 1, 2, 1]);
        let body = file_view(&profile, SIMPLE.as_bytes(), Path::new("pkg/other.go"), &simple_report()).body;
        assert!(!body.contains(UNCOVERED_CLASS));
    }

    #[test]
    fn test_escaping() {
        let src = b"a < b && c > d\tx";
        let body = annotate(src, Path::new("x.go"), &[], &Report::default());
        assert_eq!(body, "a &lt; b &amp;&amp; c &gt; d        x");
    }

    #[test]
    fn test_colors() {
        let css = colors();
        assert!(css.contains(".cov0 { color: rgb(192, 0, 0) }"));
        assert!(css.contains(".cov1 { color: rgb(128, 128, 128) }"));
        assert!(css.contains(".cov10 { color: rgb(20, 236, 155) }"));
        assert!(css.contains(".blanket-uncovered { color: rgb(252, 242, 106) }"));
    }

    #[test]
    fn test_page_layout() {
        let files = vec![
            FileView {
                name: "example.com/simple/a.go".to_string(),
                coverage: 100.0,
                body: "package a".to_string(),
            },
            FileView {
                name: "example.com/simple/b.go".to_string(),
                coverage: 12.5,
                body: "package b".to_string(),
            },
        ];
        let html = page(&files, Mode::Count);
        assert!(html.starts_with("\n<!DOCTYPE html>"));
        assert!(html.contains("<option value=\"file0\">example.com/simple/a.go (100.0%)</option>"));
        assert!(html.contains("<option value=\"file1\">example.com/simple/b.go (12.5%)</option>"));
        assert!(html.contains("<pre class=\"file\" id=\"file0\" >package a</pre>"));
        assert!(html.contains("<pre class=\"file\" id=\"file1\" style=\"display: none\">package b</pre>"));
        assert!(html.contains("<span class=\"cov10\">high coverage</span>"));
        assert!(html.ends_with("</html>\n"));

        let set = page(&files, Mode::Set);
        assert!(set.contains("<span class=\"cov8\">covered</span>"));
        assert!(!set.contains("high coverage"));
    }
}
