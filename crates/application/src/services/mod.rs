mod reply_builder;

pub use reply_builder::ReplyBuilder;
