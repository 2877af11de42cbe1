//! A scripted stand-in for the note tool.

/// POSIX shell script implementing a small subset of the note tool.
///
/// Accepts `[-p <profile>] [-f <folder>] <command> [args...]` and keeps
/// plaintext profiles only. Commands:
///
/// - `new-profile [name]`
/// - `add <title> [-s|-u] [-b <body> | -]`
/// - `clear [-y]`, prompting on stdin without `-y`
/// - `hang`, which sleeps well past any test timeout
pub const FAKE_TOOL_SCRIPT: &str = r#"#!/bin/sh
profile=default
folder=.
while [ $# -gt 0 ]; do
  case "$1" in
    -p) profile="$2"; shift 2 ;;
    -f) folder="$2"; shift 2 ;;
    *) break ;;
  esac
done
cmd="$1"
[ $# -gt 0 ] && shift

write_profile() {
  notes=$(paste -sd, "$folder/.$profile.notes" 2>/dev/null)
  printf '{"encrypted":false,"notes":[%s]}' "$notes" > "$folder/$profile.json"
}

case "$cmd" in
  new-profile)
    if [ -n "$1" ]; then profile="$1"; fi
    mkdir -p "$folder"
    : > "$folder/.$profile.notes"
    write_profile
    ;;
  add)
    title="$1"; shift
    status=""; body=""
    while [ $# -gt 0 ]; do
      case "$1" in
        -s) status="Started" ;;
        -u) status="Urgent" ;;
        -b) body="$2"; shift ;;
        -) body=$(cat) ;;
      esac
      shift
    done
    id=$(( $(wc -l < "$folder/.$profile.notes") + 1 ))
    printf '{"id":%d,"title":"%s","status":"%s","body":"%s","last_touched":"2015-01-22 23:15:04 -0800"}\n' \
      "$id" "$title" "$status" "$body" >> "$folder/.$profile.notes"
    write_profile
    ;;
  clear)
    answer=""
    if [ "$1" != "-y" ]; then read -r answer; fi
    if [ "$1" = "-y" ] || [ "$answer" = "y" ]; then
      : > "$folder/.$profile.notes"
      write_profile
    fi
    ;;
  hang)
    exec sleep 30
    ;;
  *)
    exit 1
    ;;
esac
"#;
