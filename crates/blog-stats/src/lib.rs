//! blog-stats: summary statistics over a list of blog posts.
//!
//! Every function here is pure. Inputs are borrowed and never mutated, and
//! the same input always yields the same output. Where several candidates
//! share the maximum value, the one that appears first in the input wins.

use serde::{Deserialize, Serialize};

/// Anything the aggregator can read an author and a like count from.
pub trait PostRecord {
    fn author(&self) -> &str;
    fn likes(&self) -> u64;
}

/// Minimal post shape: the fields the statistics actually look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub author: String,
    pub likes: u64,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, author: impl Into<String>, likes: u64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            likes,
        }
    }
}

impl PostRecord for BlogPost {
    fn author(&self) -> &str {
        &self.author
    }

    fn likes(&self) -> u64 {
        self.likes
    }
}

impl<P: PostRecord + ?Sized> PostRecord for &P {
    fn author(&self) -> &str {
        (**self).author()
    }

    fn likes(&self) -> u64 {
        (**self).likes()
    }
}

/// Author with the highest number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: u64,
}

/// Author with the highest like total across their posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// All four statistics computed over one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogSummary<'a, P> {
    pub total_likes: u64,
    pub favourite_blog: Option<&'a P>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

/// Sum of likes over every post. Zero for an empty list, and capped at
/// `u64::MAX` rather than overflowing.
pub fn total_likes<P: PostRecord>(posts: &[P]) -> u64 {
    posts
        .iter()
        .fold(0u64, |sum, post| sum.saturating_add(post.likes()))
}

/// The post with the most likes, or `None` for an empty list.
///
/// A non-empty list always has a favourite, even when every post sits at
/// zero likes; in that case it is the first post.
pub fn favourite_blog<P: PostRecord>(posts: &[P]) -> Option<&P> {
    let (first, rest) = posts.split_first()?;
    let best = rest.iter().fold(first, |best, post| {
        if post.likes() > best.likes() {
            post
        } else {
            best
        }
    });
    Some(best)
}

/// The author who wrote the most posts.
pub fn most_blogs<P: PostRecord>(posts: &[P]) -> Option<AuthorBlogs> {
    let (author, blogs) = top_author(posts, |_| 1)?;
    Some(AuthorBlogs {
        author: author.to_string(),
        blogs,
    })
}

/// The author whose posts collected the most likes in total.
pub fn most_likes<P: PostRecord>(posts: &[P]) -> Option<AuthorLikes> {
    let (author, likes) = top_author(posts, |post| post.likes())?;
    Some(AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

/// Runs all four statistics over `posts`.
pub fn summarize<P: PostRecord>(posts: &[P]) -> BlogSummary<'_, P> {
    BlogSummary {
        total_likes: total_likes(posts),
        favourite_blog: favourite_blog(posts),
        most_blogs: most_blogs(posts),
        most_likes: most_likes(posts),
    }
}

/// Groups posts by exact author name in first-seen order, accumulating
/// `weight` per post, and returns the first group holding the maximum.
fn top_author<'a, P, F>(posts: &'a [P], weight: F) -> Option<(&'a str, u64)>
where
    P: PostRecord,
    F: Fn(&P) -> u64,
{
    let mut groups: Vec<(&'a str, u64)> = Vec::new();

    for post in posts {
        let author = post.author();
        match groups.iter_mut().find(|(name, _)| *name == author) {
            Some((_, total)) => *total = total.saturating_add(weight(post)),
            None => groups.push((author, weight(post))),
        }
    }

    let mut groups = groups.into_iter();
    let first = groups.next()?;
    Some(groups.fold(first, |best, group| {
        if group.1 > best.1 {
            group
        } else {
            best
        }
    }))
}
