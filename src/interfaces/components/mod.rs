pub mod notice_banner;
