//! Canned replies and new-file boilerplate

pub const GREETING: &str = "Hello! How can I help you with your code today?";

pub const DEBUG_CHECKLIST: &str = "I can help you debug! Here are some steps:
1. Check the console for error messages
2. Verify variable types and function signatures
3. Make sure all dependencies are imported
4. Test edge cases

What specific issue are you encountering?";

pub const FIBONACCI_EXPLANATION: &str = "This code implements the Fibonacci sequence using recursion. The fibonacci function:
- Returns n if n is 0 or 1 (base case)
- Otherwise, recursively calls itself with n-1 and n-2 and returns their sum
- The result grows exponentially: 0, 1, 1, 2, 3, 5, 8, 13...";

pub const EXPLAIN_PROMPT: &str =
    "I can explain any code you have in the editor. What would you like me to clarify?";

pub const OPTIMIZATION_TIPS: &str = "Here are some optimization suggestions:
- Use memoization for recursive functions
- Avoid nested loops where possible
- Use const/let instead of var
- Implement proper error handling
- Add type annotations for better type safety

Would you like me to help with a specific optimization?";

pub const REACT_CAPABILITIES: &str = "I can help you build React components! I can create:
- Functional components with hooks
- TypeScript interfaces
- State management with useState
- Side effects with useEffect
- Custom hooks

What would you like to build?";

pub const API_GUIDANCE: &str = "For API calls, I recommend:
- Use fetch() or axios for HTTP requests
- Handle loading states
- Implement error handling with try/catch
- Use async/await for cleaner code
- Consider using React Query or SWR for data fetching

Need help implementing an API call?";

pub const FALLBACK: &str = "I'm here to help! I can:
- Write and explain code
- Debug issues
- Create new files and components
- Optimize code performance
- Answer programming questions
- Suggest best practices

What would you like to work on?";

pub const REACT_COMPONENT: &str = "import React from 'react'

export default function Component() {
  return (
    <div>
      <h1>Hello World</h1>
    </div>
  )
}";

pub const PYTHON_SCRIPT: &str = "def main():
    print(\"Hello World\")

if __name__ == \"__main__\":
    main()";

pub const JAVA_MAIN: &str = "public class Main {
    public static void main(String[] args) {
        System.out.println(\"Hello World\");
    }
}";

pub const JAVASCRIPT_MAIN: &str = "function main() {
  console.log(\"Hello World\");
}

main();";

pub fn created_file(name: &str) -> String {
    format!("I've created a new file called {name} with a basic template. You can see it in the editor!")
}
