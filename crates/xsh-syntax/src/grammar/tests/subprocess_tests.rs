use super::shot;

#[test]
fn pipeline_with_redirects_in_background() {
    insta::assert_snapshot!(shot("ls -la | grep foo > out.txt 2>&1 &\n"), @r#"
    Module
      BareSubprocess
        BackgroundCommand
          SubprocessPipeline
            SubprocessCommand
              SubprocessArgument
                SubprocessWord "ls"
              SubprocessArgument
                SubprocessWord "-la"
            SubprocessPipe "|"
            SubprocessCommand
              SubprocessArgument
                SubprocessWord "grep"
              SubprocessArgument
                SubprocessWord "foo"
              SubprocessRedirect
                Redirect ">"
                SubprocessArgument
                  SubprocessWord "out.txt"
              StreamMerge "2>&1"
          Background "&"
        Newline "\n"
    "#);
}

#[test]
fn logical_chain() {
    insta::assert_snapshot!(shot("make all && make install\n"), @r#"
    Module
      BareSubprocess
        SubprocessLogical
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "make"
            SubprocessArgument
              SubprocessWord "all"
          SubprocessAnd "&&"
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "make"
            SubprocessArgument
              SubprocessWord "install"
        Newline "\n"
    "#);
}

#[test]
fn environment_prefix() {
    insta::assert_snapshot!(shot("$FOO=bar ls\n"), @r#"
    Module
      BareSubprocess
        EnvScopedCommand
          EnvPrefix "$FOO=bar"
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
        Newline "\n"
    "#);
}

#[test]
fn output_modifier() {
    insta::assert_snapshot!(shot("x = $(@json cat f)\n"), @r#"
    Module
      Assignment
        Name "x"
        Equals "="
        CapturedSubprocess
          DollarParen "$("
          SubprocessCommand
            SubprocessModifier "@json"
            SubprocessArgument
              SubprocessWord "cat"
            SubprocessArgument
              SubprocessWord "f"
          ParenClose ")"
        Newline "\n"
    "#);
}

#[test]
fn argument_pieces_concatenate() {
    insta::assert_snapshot!(shot("echo file_$(date).log\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "echo"
          SubprocessArgument
            SubprocessWord "file_"
            CapturedSubprocess
              DollarParen "$("
              SubprocessCommand
                SubprocessArgument
                  SubprocessWord "date"
              ParenClose ")"
            SubprocessWord ".log"
        Newline "\n"
    "#);
}

#[test]
fn environment_in_arguments() {
    insta::assert_snapshot!(shot("echo $HOME ${x}\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "echo"
          SubprocessArgument
            EnvVariable "$HOME"
          SubprocessArgument
            EnvVariableBraced
              DollarBrace "${"
              Name "x"
              BraceClose "}"
        Newline "\n"
    "#);
}

#[test]
fn object_and_uncaptured_forms() {
    insta::assert_snapshot!(shot("x = !(ls)\n$[ls]\n"), @r#"
    Module
      Assignment
        Name "x"
        Equals "="
        CapturedSubprocessObject
          BangParen "!("
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
          ParenClose ")"
        Newline "\n"
      ExpressionStatement
        UncapturedSubprocess
          DollarBracket "$["
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
          BracketClose "]"
        Newline "\n"
    "#);
}

#[test]
fn regex_glob_argument() {
    insta::assert_snapshot!(shot("ls `.*\\.py`\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "ls"
          SubprocessArgument
            RegexGlob "`.*\\.py`"
        Newline "\n"
    "#);
}

#[test]
fn lone_name_stays_python() {
    insta::assert_snapshot!(shot("ls\ny = 1\n"), @r#"
    Module
      ExpressionStatement
        Name "ls"
        Newline "\n"
      Assignment
        Name "y"
        Equals "="
        Integer "1"
        Newline "\n"
    "#);
}

#[test]
fn comment_ends_the_command() {
    insta::assert_snapshot!(shot("ls -l # long\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "ls"
          SubprocessArgument
            SubprocessWord "-l"
        Newline "\n"
    "#);
}

#[test]
fn brace_expansion_pieces() {
    insta::assert_snapshot!(shot("echo file{1,2}.txt {a,b} {}\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "echo"
          SubprocessArgument
            SubprocessWord "file"
            BraceExpansion "{1,2}"
            SubprocessWord ".txt"
          SubprocessArgument
            BraceExpansion "{a,b}"
          SubprocessArgument
            SubprocessWord "{}"
        Newline "\n"
    "#);
}

#[test]
fn brace_expansion_starts_a_command_line() {
    insta::assert_snapshot!(shot("mkdir {src,tests}\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "mkdir"
          SubprocessArgument
            BraceExpansion "{src,tests}"
        Newline "\n"
    "#);
}

#[test]
fn subprocess_macro_keeps_the_line_raw() {
    insta::assert_snapshot!(shot("timeit! ls -la | wc\nls!\n"), @r#"
    Module
      BareSubprocess
        SubprocessMacro
          SubprocessWord "timeit"
          Bang "!"
          MacroArgument "ls -la | wc"
        Newline "\n"
      BareSubprocess
        SubprocessMacro
          SubprocessWord "ls"
          Bang "!"
        Newline "\n"
    "#);
}

#[test]
fn subprocess_macro_after_environment_prefix() {
    insta::assert_snapshot!(shot("$X=1 echo! $X (raw)\n"), @r#"
    Module
      BareSubprocess
        EnvScopedCommand
          EnvPrefix "$X=1"
          SubprocessMacro
            SubprocessWord "echo"
            Bang "!"
            MacroArgument "$X (raw)"
        Newline "\n"
    "#);
}

#[test]
fn custom_function_glob_argument() {
    insta::assert_snapshot!(shot("ls @mine`.*\\.py`\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "ls"
          SubprocessArgument
            CustomFunctionGlob "@mine`.*\\.py`"
        Newline "\n"
    "#);
}
