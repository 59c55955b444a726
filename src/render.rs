//! Text renderings of ranked posts.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::aggregate::Post;

/// Write the numbered console listing of `posts` to `out`.
pub fn print_feed(out: &mut impl Write, posts: &[Post]) -> io::Result<()> {
    writeln!(out, "\n🤖 AI Feed - {} posts\n", posts.len())?;
    writeln!(out, "{}", "-".repeat(60))?;

    for (rank, post) in posts.iter().enumerate() {
        writeln!(out, "{}. [{}] {}", rank + 1, post.icon, post.title)?;
        writeln!(out, "   {}", post.link)?;
        writeln!(out, "   {} {} {}", post.source, score_label(post), post.date)?;
        writeln!(out)?;
    }
    Ok(())
}

/// The same fields as [`print_feed`], as a Markdown list for embedding in a
/// larger document.
pub fn markdown_listing(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "*No posts available right now.*\n".to_string();
    }

    let mut md = String::new();
    for (rank, post) in posts.iter().enumerate() {
        let title = if post.link.is_empty() {
            post.title.clone()
        } else {
            format!("[{}]({})", post.title, post.link)
        };
        let _ = write!(md, "{}. {} {}", rank + 1, post.icon, title);
        let _ = write!(md, " — *{}*", post.source);
        if post.score > 0 {
            let _ = write!(md, " · ⬆️ {}", post.score);
        }
        if !post.date.is_empty() {
            let _ = write!(md, " · {}", post.date);
        }
        md.push('\n');
    }
    md
}

fn score_label(post: &Post) -> String {
    if post.score > 0 {
        format!("⬆️ {}", post.score)
    } else {
        String::new()
    }
}
