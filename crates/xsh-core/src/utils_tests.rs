use crate::utils::{preview, to_snake_case};

#[test]
fn snake_case_from_pascal() {
    assert_eq!(to_snake_case("FooBar"), "foo_bar");
    assert_eq!(to_snake_case("Foo"), "foo");
    assert_eq!(to_snake_case("CapturedSubprocessObject"), "captured_subprocess_object");
}

#[test]
fn snake_case_from_camel() {
    assert_eq!(to_snake_case("fooBar"), "foo_bar");
    assert_eq!(to_snake_case("fooBarBaz"), "foo_bar_baz");
}

#[test]
fn snake_case_passthrough() {
    assert_eq!(to_snake_case("foo_bar"), "foo_bar");
    assert_eq!(to_snake_case(""), "");
}

#[test]
fn preview_escapes_and_truncates() {
    assert_eq!(preview("ls -la\n", 10), "ls -la\\n");
    assert_eq!(preview("abcdef", 3), "abc…");
    assert_eq!(preview("a\tb", 10), "a\\tb");
}
