//! The article schema stored in `articles.json`.

crate::json_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Author {
        pub name: String => "Name" as "name",
        pub email: String => "Email" as "email",
    }
}

crate::json_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Comment {
        pub id: u64 => "Id" as "id",
        pub author: Author => "Author" as "author",
        pub content: String => "Content" as "content",
    }
}

crate::json_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Article {
        pub id: u64 => "Id" as "id",
        pub title: String => "Title" as "title",
        pub author: Author => "Author" as "author",
        pub content: String => "Content" as "content",
        pub recommends: Vec<String> => "Recommends" as "recommends",
        pub comments: Vec<Comment> => "Comments" as "comments",
    }
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Author {
        Author {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The single article used by the `articles` commands and the tests.
pub fn sample_articles() -> Vec<Article> {
    vec![Article {
        id: 1,
        title: "Hello, world!".into(),
        author: Author::new("Maria", "maria@example.com"),
        content: "Hello~".into(),
        recommends: vec!["John".into(), "Andrew".into()],
        comments: vec![Comment {
            id: 1,
            author: Author::new("Andrew", "andrew@hello.com"),
            content: "Hello Maria".into(),
        }],
    }]
}
