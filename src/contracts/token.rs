//! ERC20 token contract bindings (mintable, burnable, pausable)

use alloy::sol;

sol! {
    /// ERC20 interface with the admin extensions the session drives
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the name of the token
        function name() external view returns (string memory);

        /// Returns the symbol of the token
        function symbol() external view returns (string memory);

        /// Returns the total supply of the token
        function totalSupply() external view returns (uint256);

        /// Returns the balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Transfers tokens to a recipient
        function transfer(address to, uint256 amount) external returns (bool);

        /// Creates `amount` tokens for `to`
        function mint(address to, uint256 amount) external;

        /// Destroys `amount` tokens from the caller
        function burn(uint256 amount) external;

        /// Halts transfers
        function pause() external;

        /// Resumes transfers
        function unpause() external;

        /// Emitted when tokens are transferred
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}
