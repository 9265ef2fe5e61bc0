use unity_attrs::ErrorKind;
use unity_error::Error;

/// The command was not recognized.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown command `{}`", name),
    labels = ["this command"],
    help = "type `help` to list the available commands",
)]
struct UnknownCommand {
    name: String,
}

/// No expression was generated yet.
#[derive(Debug, ErrorKind)]
#[error(message = "nothing to inspect yet", labels = ["", "this argument"])]
struct NothingYet;

/// Renders the report of the given error without color codes.
fn render(err: &Error, input: &str) -> String {
    let mut buf = Vec::new();
    err.write_report("input", input, &mut buf).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
}

#[test]
fn named_fields_in_message() {
    let input = "genrate high";
    let err = Error::new(vec![0..7], UnknownCommand { name: "genrate".to_string() });
    let report = render(&err, input);

    assert!(report.contains("unknown command `genrate`"));
    assert!(report.contains("this command"));
    assert!(report.contains("type `help` to list the available commands"));
}

#[test]
fn unit_struct_with_fewer_spans_than_labels() {
    let input = "steps";
    let err = Error::new(vec![0..5], NothingYet);
    let report = render(&err, input);

    assert!(report.contains("nothing to inspect yet"));
    assert!(!report.contains("this argument"));
}
