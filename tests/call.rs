#[macro_use]
mod common;

#[cfg(test)]
mod call {
    tests! {
        bool:
        "true();"
        => ERR "[line 1:6] Runtime error: Can only call functions and classes."
    }

    tests! {
        nil:
        "nil();"
        => ERR "[line 1:5] Runtime error: Can only call functions and classes."
    }

    tests! {
        num:
        "123();"
        => ERR "[line 1:5] Runtime error: Can only call functions and classes."
    }

    tests! {
        object:
        "class Foo {} var foo = Foo(); foo();"
        => ERR "[line 1:35] Runtime error: Can only call functions and classes."
    }

    tests! {
        string:
        "\"str\"();"
        => ERR "[line 1:7] Runtime error: Can only call functions and classes."
    }
}
