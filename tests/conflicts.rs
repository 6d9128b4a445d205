use rstest::rstest;
use serde_form_tree::{decode, render_path, ErrorKind};

fn decode_err(input: &str) -> serde_form_tree::Error {
    match decode(input) {
        Ok(value) => panic!("expected {input:?} to fail, got {value}"),
        Err(err) => err,
    }
}

#[rstest]
#[case("a[b]=1&a=2", "a")]
#[case("a=2&a[b]=1", "a")]
#[case("a[]=1&a=2", "a")]
#[case("a=1&a=2&a[]=3", "a")]
fn bare_and_bracketed_use_conflicts(#[case] input: &str, #[case] path: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::BareBracketMixConflict);
    assert_eq!(err.path_string(), path);
    assert!(err.to_string().contains(&format!("`{path}`")));
}

#[rstest]
#[case("a[x]=2&a[x][]=3", "a[x]")]
#[case("a[x][]=3&a[x]=2", "a[x]")]
#[case("a[x]=1&a[x][y]=2", "a[x]")]
#[case("a[x][y]=2&a[x]=1", "a[x]")]
#[case("a[0]=1&a[0][0]=2", "a[0]")]
#[case("a[]=1&a[0][x]=2", "a[0]")]
fn scalar_and_container_conflicts(#[case] input: &str, #[case] path: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::ScalarContainerConflict);
    assert_eq!(err.path_string(), path);
    assert!(err.to_string().contains(path));
}

#[rstest]
#[case("a[x]=1&a[0]=2", "a[0]")]
#[case("a[0]=1&a[x]=2", "a[x]")]
#[case("a[]=1&a[x]=2", "a[x]")]
#[case("a[x]=1&a[]=2", "a[]")]
fn named_and_indexed_conflicts(#[case] input: &str, #[case] path: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::ContainerKindConflict);
    assert_eq!(err.path_string(), path);
}

#[rstest]
#[case("a[x]=1&a[x]=2", "a[x]")]
#[case("a[0]=1&a[0]=2", "a[0]")]
#[case("a[]=1&a[0]=2", "a[0]")]
#[case("a[0]=1&a[]=2", "a[0]")]
#[case("a[1]=1&a[]=x&a[]=y", "a[1]")]
#[case("a[x][y]=1&a[x][y]", "a[x][y]")]
fn duplicate_assignments(#[case] input: &str, #[case] path: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::DuplicateAssignment);
    assert_eq!(err.path_string(), path);
}

#[rstest]
#[case("a[][]=0", "a[]")]
#[case("a[][x]=0", "a[]")]
#[case("a[b=1", "a")]
#[case("a[[b]]=1", "a")]
#[case("a[x]]=1", "a[x]")]
#[case("a[x]y=1", "a[x]")]
fn malformed_keys(#[case] input: &str, #[case] path: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::MalformedBracketSyntax);
    assert_eq!(render_path(&err.path), path);
    assert!(err.to_string().contains(path));
}

#[rstest]
fn malformed_key_is_named_in_message() {
    let err = decode_err("ok=1&a]=2");
    assert_eq!(err.kind, ErrorKind::MalformedBracketSyntax);
    assert_eq!(err.key.as_deref(), Some("a]"));
    assert!(err.to_string().contains("`a]`"));
}

#[rstest]
#[case("[x]=1")]
#[case("[]=1")]
#[case("=1")]
#[case("%5B0%5D=1")]
fn keys_without_a_leading_name(#[case] input: &str) {
    let err = decode_err(input);
    assert_eq!(err.kind, ErrorKind::EmptyRootSegment);
}

#[rstest]
fn conflict_kinds_are_classified() {
    assert!(decode_err("a[x]=1&a[x]=2").kind.is_conflict());
    assert!(!decode_err("a[][]=0").kind.is_conflict());
}
