use blog_stats::{
    favourite_blog, most_blogs, most_likes, summarize, total_likes, AuthorBlogs, AuthorLikes,
    BlogPost,
};

fn fixture() -> Vec<BlogPost> {
    vec![
        BlogPost::new("React patterns", "Michael Chan", 21),
        BlogPost::new("Go To Statement Considered Harmful", "Edsger W. Dijkstra", 5),
        BlogPost::new("Canonical string reduction", "Edsger W. Dijkstra", 12),
        BlogPost::new("First class tests", "Robert C. Martin", 10),
        BlogPost::new("TDD harms architecture", "Robert C. Martin", 0),
        BlogPost::new("Type wars", "Robert C. Martin", 2),
    ]
}

#[test]
fn test_fixture_statistics() {
    let posts = fixture();

    assert_eq!(total_likes(&posts), 50);
    assert_eq!(
        favourite_blog(&posts),
        Some(&BlogPost::new("React patterns", "Michael Chan", 21))
    );
    assert_eq!(
        most_blogs(&posts),
        Some(AuthorBlogs {
            author: "Robert C. Martin".to_string(),
            blogs: 3,
        })
    );
    assert_eq!(
        most_likes(&posts),
        Some(AuthorLikes {
            author: "Edsger W. Dijkstra".to_string(),
            likes: 17,
        })
    );
}

#[test]
fn test_repeated_calls_agree_and_leave_input_untouched() {
    let posts = fixture();
    let before = posts.clone();

    let first = summarize(&posts);
    let second = summarize(&posts);

    assert_eq!(first, second);
    assert_eq!(posts, before);
}

#[test]
fn test_summary_json_shape() {
    let posts = fixture();
    let json = serde_json::to_value(summarize(&posts)).unwrap();

    assert_eq!(json["total_likes"], 50);
    assert_eq!(json["favourite_blog"]["title"], "React patterns");
    assert_eq!(json["most_blogs"]["author"], "Robert C. Martin");
    assert_eq!(json["most_blogs"]["blogs"], 3);
    assert_eq!(json["most_likes"]["likes"], 17);
}
